//! Email-based application status lookup.
//!
//! For every application of one participant we aggregate the full roster of
//! the position and count who was accepted there and who was accepted
//! elsewhere. Roster summaries are cached per position, so a position shared
//! by several rows (or looked up again within the TTL) is aggregated once.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::aggregator::Aggregator;
use crate::cache::TtlCache;
use crate::config::ClientConfig;
use crate::error::{MagangError, Result};
use crate::fetcher::{PageRequest, PageSource, MISSING_DATA};
use crate::json::{as_id, object_field, str_field};
use crate::models::{parse_api_date, ApplicationStatusRow, SelectionStatus};

/// Per-position roster statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RosterSummary {
    pub accepted: usize,
    pub accepted_elsewhere: usize,
    pub total_applicants: u64,
    pub failed_pages: usize,
}

impl RosterSummary {
    /// Count status sentinels over a roster.
    pub fn from_participants(participants: &[Value], total_applicants: u64) -> Self {
        let mut summary = Self {
            total_applicants,
            ..Self::default()
        };
        for status in participants.iter().filter_map(SelectionStatus::of_participant) {
            match status {
                SelectionStatus::Accepted => summary.accepted += 1,
                SelectionStatus::AcceptedElsewhere => summary.accepted_elsewhere += 1,
                SelectionStatus::Other(_) => {}
            }
        }
        summary
    }
}

pub type RosterCache = TtlCache<String, RosterSummary>;

/// Result of one email lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub rows: Vec<ApplicationStatusRow>,
    /// `false` when an unparseable application date prevented sorting; rows
    /// are then in lookup order.
    pub sorted_by_date: bool,
    /// Roster pages that could not be fetched, summed over all positions.
    pub failed_roster_pages: usize,
}

pub struct StatusLookup<S: ?Sized> {
    aggregator: Aggregator<S>,
    participants_url: String,
    page_size: u32,
    rosters: Arc<RosterCache>,
}

impl<S> StatusLookup<S>
where
    S: PageSource + ?Sized + 'static,
{
    pub fn new(aggregator: Aggregator<S>, config: &ClientConfig, rosters: Arc<RosterCache>) -> Self {
        Self {
            aggregator,
            participants_url: config.participants_url(),
            page_size: config.page_size,
            rosters,
        }
    }

    /// Look up every application registered under `email`.
    pub async fn lookup_status(&self, email: &str) -> Result<StatusReport> {
        let email = email.trim();
        if email.is_empty() {
            return Err(MagangError::InvalidInput("email must not be empty".into()));
        }

        let request = PageRequest::new(&self.participants_url, self.page_size).filter("email", email);
        let not_found = || MagangError::NotFound(format!("no participant data for {email}"));
        let page = match self.aggregator.source().fetch_page(&request).await {
            Ok(page) => page,
            // Unknown emails may come back without a `data` key at all.
            Err(MagangError::MalformedResponse(reason)) if reason == MISSING_DATA => {
                return Err(not_found())
            }
            Err(e) => return Err(e),
        };
        if page.records.is_empty() {
            return Err(not_found());
        }

        info!(applications = page.records.len(), "participant found, loading rosters");

        let mut rows = Vec::with_capacity(page.records.len());
        let mut failed_roster_pages = 0;
        let mut unparseable_date = false;

        for participation in &page.records {
            let position = object_field(participation, "program_posisi");
            let company = object_field(participation, "perusahaan");
            let schedule = object_field(participation, "jadwal");
            let selection = object_field(participation, "ref_status_seleksi");

            let position_id = position.get("id_posisi").and_then(as_id);
            let roster = match &position_id {
                Some(id) => self.roster_summary(id).await,
                None => {
                    warn!("participation row without id_posisi, roster counts left at zero");
                    RosterSummary::default()
                }
            };
            failed_roster_pages += roster.failed_pages;

            let raw_date = str_field(schedule, "tanggal_pendaftaran_awal");
            let application_date = raw_date.and_then(parse_api_date);
            if raw_date.is_some_and(|d| !d.trim().is_empty()) && application_date.is_none() {
                unparseable_date = true;
            }

            rows.push(ApplicationStatusRow {
                position_id,
                position_title: text(position, "posisi"),
                company_name: text(company, "nama_perusahaan"),
                company_address: text(company, "alamat"),
                application_date,
                selection_status_label: text(selection, "nama_status_seleksi"),
                accepted_count: roster.accepted,
                total_applicants: roster.total_applicants,
                accepted_elsewhere_count: roster.accepted_elsewhere,
            });
        }

        let sorted_by_date = !unparseable_date;
        if sorted_by_date {
            sort_newest_first(&mut rows);
        } else {
            warn!("unparseable application date, returning rows unsorted");
        }

        Ok(StatusReport {
            rows,
            sorted_by_date,
            failed_roster_pages,
        })
    }

    /// Roster statistics for one position, cached for the TTL.
    ///
    /// A failed aggregation is logged and reported as an empty roster with one
    /// failed page; the rest of the lookup continues.
    pub async fn roster_summary(&self, position_id: &str) -> RosterSummary {
        let key = position_id.to_string();
        if let Some(cached) = self.rosters.get(&key) {
            return cached;
        }

        let request = PageRequest::new(&self.participants_url, self.page_size)
            .filter("id_posisi", position_id);

        match self.aggregator.aggregate_all(&request).await {
            Ok(outcome) => {
                let summary = RosterSummary {
                    failed_pages: outcome.failed_pages.len(),
                    ..RosterSummary::from_participants(&outcome.records, outcome.expected_total())
                };
                // Only complete rosters are worth reusing.
                if outcome.failed_pages.is_empty() {
                    self.rosters.insert(key, summary);
                }
                summary
            }
            Err(e) => {
                warn!(position_id, error = %e, "roster aggregation failed");
                RosterSummary {
                    failed_pages: 1,
                    ..RosterSummary::default()
                }
            }
        }
    }
}

fn text(object: &Value, key: &str) -> String {
    str_field(object, key).unwrap_or_default().to_string()
}

/// Newest application first; rows without a date go last.
fn sort_newest_first(rows: &mut [ApplicationStatusRow]) {
    rows.sort_by(|a, b| b.application_date.cmp(&a.application_date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn row(date: Option<(i32, u32, u32)>) -> ApplicationStatusRow {
        ApplicationStatusRow {
            position_id: None,
            position_title: String::new(),
            company_name: String::new(),
            company_address: String::new(),
            application_date: date.and_then(|(y, m, d)| {
                NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(0, 0, 0))
            }),
            selection_status_label: String::new(),
            accepted_count: 0,
            total_applicants: 0,
            accepted_elsewhere_count: 0,
        }
    }

    #[test]
    fn test_roster_summary_counts_sentinels() {
        let mut participants: Vec<Value> = (0..6)
            .map(|_| json!({"ref_status_seleksi": {"id_status_seleksi": 1}}))
            .collect();
        participants.extend((0..3).map(|_| json!({"ref_status_seleksi": {"id_status_seleksi": 2}})));
        participants.push(json!({"ref_status_seleksi": {"id_status_seleksi": "4"}}));

        let summary = RosterSummary::from_participants(&participants, 10);
        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.accepted_elsewhere, 1);
        assert_eq!(summary.total_applicants, 10);
    }

    #[test]
    fn test_sort_newest_first_with_missing_last() {
        let mut rows = vec![
            row(Some((2025, 9, 1))),
            row(None),
            row(Some((2025, 10, 5))),
        ];
        sort_newest_first(&mut rows);
        let dates: Vec<_> = rows.iter().map(|r| r.application_date.map(|d| d.date())).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 10, 5),
                NaiveDate::from_ymd_opt(2025, 9, 1),
                None
            ]
        );
    }
}
