//! Snapshot collection from the active-vacancy listing.

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::{Aggregator, PageFailure};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::fetcher::{PageRequest, PageSource};
use crate::models::ListingRecord;

/// Result of one collection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectReport {
    pub records: Vec<ListingRecord>,
    /// Raw items that could not be turned into a record.
    pub skipped: usize,
    pub failed_pages: Vec<PageFailure>,
    pub truncated: bool,
}

impl CollectReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The vacancy query the snapshot is built from: least-registered first.
pub fn vacancy_request(config: &ClientConfig) -> PageRequest {
    PageRequest::new(config.vacancies_url(), config.page_size)
        .filter("order_by", "jumlah_terdaftar")
        .filter("order_direction", "ASC")
}

/// Aggregate every active vacancy and convert it to a [`ListingRecord`].
pub async fn collect_vacancies<S>(aggregator: &Aggregator<S>, config: &ClientConfig) -> Result<CollectReport>
where
    S: PageSource + ?Sized + 'static,
{
    let outcome = aggregator.aggregate_all(&vacancy_request(config)).await?;

    let mut records = Vec::with_capacity(outcome.records.len());
    let mut skipped = 0;
    for item in &outcome.records {
        match ListingRecord::from_vacancy(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "skipping vacancy");
            }
        }
    }

    info!(
        records = records.len(),
        skipped,
        failed_pages = outcome.failed_pages.len(),
        "vacancy collection finished"
    );

    Ok(CollectReport {
        records,
        skipped,
        failed_pages: outcome.failed_pages,
        truncated: outcome.truncated,
    })
}
