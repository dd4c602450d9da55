//! Terminal rendering of listings and status rows.

use console::{style, StyledObject};

use maganghub_core::config::position_view_url;
use maganghub_core::probability::{percent_label, ProbabilityBand};
use maganghub_core::{ApplicationStatusRow, ListingRecord};

fn styled_percent(probability: f64) -> StyledObject<String> {
    let label = format!("{:>4}", percent_label(probability));
    match ProbabilityBand::of(probability) {
        ProbabilityBand::High => style(label).green().bold(),
        ProbabilityBand::Medium => style(label).yellow().bold(),
        ProbabilityBand::Low => style(label).red().bold(),
    }
}

/// Three lines per listing: headline, location and counters, link.
pub fn format_listing(record: &ListingRecord) -> String {
    let deadline = record
        .registration_deadline
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{}  {} {}\n      {}, {} | {}/{} registered | closes {}\n      {}",
        styled_percent(record.acceptance_probability),
        style(&record.position_title).bold(),
        style(format!("({})", record.company_name)).dim(),
        record.district,
        record.region,
        record.registered_count,
        record.quota,
        deadline,
        style(position_view_url(&record.position_id)).cyan(),
    )
}

pub fn format_status_row(row: &ApplicationStatusRow) -> String {
    let applied = row
        .application_date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{} {}\n  Status: {}  Applied: {}\n  Accepted: {}  Applicants: {}  Accepted elsewhere: {}\n  {}",
        style(&row.position_title).bold(),
        style(format!("at {}", row.company_name)).dim(),
        style(&row.selection_status_label).cyan(),
        applied,
        style(row.accepted_count).green(),
        row.total_applicants,
        style(row.accepted_elsewhere_count).yellow(),
        row.company_address,
    )
}
