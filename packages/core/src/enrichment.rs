//! Snapshot enrichment with live counters.
//!
//! Each record's quota and registered count are refreshed from the detail
//! endpoint through a TTL cache keyed by position id. Lookup failures are
//! not fatal: the snapshot values pass through unchanged.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::error::Result;
use crate::fetcher::DetailSource;
use crate::models::{ListingRecord, LiveCounters};

/// Cache of detail lookups. `None` records that the API had no data for the
/// position; errors are never cached.
pub type DetailCache = TtlCache<String, Option<LiveCounters>>;

pub struct Enricher<D: ?Sized> {
    source: Arc<D>,
    cache: Arc<DetailCache>,
}

impl<D: ?Sized> Clone for Enricher<D> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<D> Enricher<D>
where
    D: DetailSource + ?Sized,
{
    pub fn new(source: Arc<D>, cache: Arc<DetailCache>) -> Self {
        Self { source, cache }
    }

    /// Refresh every record. Output has the input's length and order.
    pub async fn enrich(&self, records: Vec<ListingRecord>) -> Vec<ListingRecord> {
        let mut enriched = Vec::with_capacity(records.len());
        for record in records {
            enriched.push(self.enrich_one(record).await);
        }
        enriched
    }

    /// Refresh one record, or hand it back unchanged when no live data is available.
    pub async fn enrich_one(&self, record: ListingRecord) -> ListingRecord {
        match self.live_counters(&record.position_id).await {
            Ok(Some(counters)) => record.with_counters(&counters),
            Ok(None) => {
                debug!(position_id = %record.position_id, "no live data, keeping snapshot values");
                record
            }
            Err(e) => {
                warn!(position_id = %record.position_id, error = %e, "live lookup failed, keeping snapshot values");
                record
            }
        }
    }

    /// Live counters for a position, served from cache within the TTL.
    pub async fn live_counters(&self, position_id: &str) -> Result<Option<LiveCounters>> {
        let key = position_id.to_string();
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let fetched = self.source.fetch_detail(position_id).await?;
        self.cache.insert(key, fetched);
        Ok(fetched)
    }
}
