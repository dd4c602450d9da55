//! Acceptance probability model.
//!
//! A uniform-random-acceptance heuristic: every applicant is equally likely
//! to land one of the `quota` slots. It estimates, it does not predict.

/// Probability that one applicant is accepted, in `[0.0, 1.0]`.
///
/// - no slots (`quota <= 0`) gives `0.0`
/// - an undersubscribed position (`registered < quota`) gives `1.0`
/// - otherwise `quota / registered`, clamped
#[must_use]
pub fn acceptance_probability(quota: i64, registered: i64) -> f64 {
    if quota <= 0 {
        return 0.0;
    }
    if registered < quota {
        return 1.0;
    }

    let p = quota as f64 / registered.max(1) as f64;
    p.clamp(0.0, 1.0)
}

/// Whole percent, rounded down (`0.999` shows as `99`).
#[must_use]
pub fn as_percent(probability: f64) -> u8 {
    (probability.clamp(0.0, 1.0) * 100.0).floor() as u8
}

/// Label shown next to a listing, e.g. `"50%"`.
#[must_use]
pub fn percent_label(probability: f64) -> String {
    format!("{}%", as_percent(probability))
}

/// Colour band shown with a listing's percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityBand {
    /// 80% and up.
    High,
    /// 40% up to 80%.
    Medium,
    Low,
}

impl ProbabilityBand {
    #[must_use]
    pub fn of(probability: f64) -> Self {
        match as_percent(probability) {
            80.. => Self::High,
            40.. => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_quota_is_zero() {
        assert_eq!(acceptance_probability(0, 5), 0.0);
        assert_eq!(acceptance_probability(0, 0), 0.0);
        assert_eq!(acceptance_probability(-3, 0), 0.0);
    }

    #[test]
    fn test_undersubscribed_is_certain() {
        assert_eq!(acceptance_probability(10, 7), 1.0);
        assert_eq!(acceptance_probability(1, 0), 1.0);
        assert_eq!(acceptance_probability(5, -1), 1.0);
    }

    #[test]
    fn test_oversubscribed_is_ratio() {
        assert_eq!(acceptance_probability(10, 20), 0.5);
        assert_eq!(acceptance_probability(10, 10), 1.0);
        assert_eq!(acceptance_probability(1, 3), 1.0 / 3.0);
    }

    #[test]
    fn test_result_always_in_unit_interval() {
        for quota in -2..15 {
            for registered in -2..40 {
                let p = acceptance_probability(quota, registered);
                assert!((0.0..=1.0).contains(&p), "p({quota}, {registered}) = {p}");
            }
        }
    }

    #[test]
    fn test_percent_label_rounds_down() {
        assert_eq!(percent_label(0.5), "50%");
        assert_eq!(percent_label(1.0 / 3.0), "33%");
        assert_eq!(percent_label(0.999), "99%");
        assert_eq!(percent_label(1.0), "100%");
        assert_eq!(percent_label(0.0), "0%");
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(ProbabilityBand::of(1.0), ProbabilityBand::High);
        assert_eq!(ProbabilityBand::of(0.8), ProbabilityBand::High);
        assert_eq!(ProbabilityBand::of(0.799), ProbabilityBand::Medium);
        assert_eq!(ProbabilityBand::of(0.4), ProbabilityBand::Medium);
        assert_eq!(ProbabilityBand::of(0.3999), ProbabilityBand::Low);
        assert_eq!(ProbabilityBand::of(0.0).as_str(), "low");
    }
}
