//! Collection aggregator.
//!
//! Fetches every page of a paginated query and merges the records:
//!
//! 1. page 1 is fetched alone to learn the pagination cursor;
//! 2. pages `2..=last_page` are fetched concurrently, at most `concurrency`
//!    requests in flight;
//! 3. records are appended in completion order, not page order;
//! 4. a failed page contributes nothing and is reported in
//!    [`AggregateOutcome::failed_pages`]. Only a page-1 failure is fatal.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::fetcher::{PageRequest, PageSource};

/// A page that could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub page: u32,
    pub error: String,
}

/// Merged result of one aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    /// Records from every page that succeeded, in completion order.
    pub records: Vec<Value>,
    /// Total reported by page 1, when the response shape carries one.
    pub total_count: Option<u64>,
    /// Number of pages the aggregation asked for (page 1 included).
    pub pages_requested: u32,
    /// Pages that contributed nothing, sorted by page number.
    pub failed_pages: Vec<PageFailure>,
    /// `true` when the collection had more pages than `max_pages`.
    pub truncated: bool,
}

impl AggregateOutcome {
    fn empty(total_count: Option<u64>) -> Self {
        Self {
            records: Vec::new(),
            total_count,
            pages_requested: 1,
            failed_pages: Vec::new(),
            truncated: false,
        }
    }

    /// Whether every requested page contributed its records.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty() && !self.truncated
    }

    /// Reported total, or the merged record count when the server reported none.
    #[must_use]
    pub fn expected_total(&self) -> u64 {
        self.total_count.unwrap_or(self.records.len() as u64)
    }
}

/// Concurrent, best-effort aggregator over a [`PageSource`].
pub struct Aggregator<S: ?Sized> {
    source: Arc<S>,
    concurrency: usize,
    max_pages: u32,
}

impl<S: ?Sized> Clone for Aggregator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            concurrency: self.concurrency,
            max_pages: self.max_pages,
        }
    }
}

impl<S> Aggregator<S>
where
    S: PageSource + ?Sized + 'static,
{
    pub fn new(source: Arc<S>, concurrency: usize, max_pages: u32) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
            max_pages: max_pages.max(1),
        }
    }

    pub fn from_config(source: Arc<S>, config: &ClientConfig) -> Self {
        Self::new(source, config.concurrency, config.max_pages)
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Fetch all pages of `request` (its `page` field is ignored).
    pub async fn aggregate_all(&self, request: &PageRequest) -> Result<AggregateOutcome> {
        let first = self.source.fetch_page(&request.at_page(1)).await?;
        let cursor = first.pagination.cursor(request.page_size)?;

        if cursor.is_empty() {
            debug!(endpoint = %request.endpoint, "collection is empty");
            return Ok(AggregateOutcome::empty(cursor.total_count));
        }

        let last_page = cursor.last_page(self.max_pages);
        let truncated = cursor.total_pages > u64::from(last_page);
        if truncated {
            warn!(
                endpoint = %request.endpoint,
                total_pages = cursor.total_pages,
                max_pages = self.max_pages,
                "collection exceeds page cap, truncating"
            );
        }

        let mut records = first.records;
        let mut failed_pages = Vec::new();
        // Pages still owed a result; anything left after draining was lost to a panic.
        let mut pending: BTreeSet<u32> = (2..=last_page).collect();

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for page in 2..=last_page {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            // Later pages use the server's page size, not ours.
            let page_request = PageRequest {
                page,
                page_size: cursor.page_size,
                ..request.clone()
            };

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = source.fetch_page(&page_request).await;
                (page, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page, Ok(fetched))) => {
                    pending.remove(&page);
                    debug!(page, records = fetched.records.len(), "page merged");
                    records.extend(fetched.records);
                }
                Ok((page, Err(e))) => {
                    pending.remove(&page);
                    warn!(endpoint = %request.endpoint, page, error = %e, "page fetch failed, skipping");
                    failed_pages.push(PageFailure {
                        page,
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!(endpoint = %request.endpoint, error = %e, "page task aborted");
                }
            }
        }

        failed_pages.extend(pending.into_iter().map(|page| PageFailure {
            page,
            error: "page task aborted".to_string(),
        }));
        failed_pages.sort_by_key(|f| f.page);

        if !failed_pages.is_empty() {
            warn!(
                endpoint = %request.endpoint,
                failed = failed_pages.len(),
                pages = last_page,
                "aggregation completed with missing pages"
            );
        }

        Ok(AggregateOutcome {
            records,
            total_count: cursor.total_count,
            pages_requested: last_page,
            failed_pages,
            truncated,
        })
    }
}
