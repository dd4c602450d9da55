use std::sync::Arc;

use maganghub_core::cache::TtlCache;
use maganghub_core::snapshot::read_snapshot;
use maganghub_core::{Aggregator, ApiClient, Catalog, DetailSource, Enricher, PageSource, Result, StatusLookup};

use crate::config::WebConfig;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub enricher: Arc<Enricher<dyn DetailSource>>,
    pub status: Arc<StatusLookup<dyn PageSource>>,
    pub config: Arc<WebConfig>,
}

impl AppState {
    /// Load the snapshot and wire the live lookups to one shared API client.
    ///
    /// Both TTL caches live as long as the state, so they are shared by every
    /// request.
    pub fn load(config: WebConfig) -> Result<Self> {
        let catalog = Catalog::new(read_snapshot(&config.snapshot_path)?);
        let client = Arc::new(ApiClient::new(&config.client)?);
        Ok(Self::with_sources(config, catalog, client.clone(), client))
    }

    pub fn with_sources(
        config: WebConfig,
        catalog: Catalog,
        details: Arc<dyn DetailSource>,
        pages: Arc<dyn PageSource>,
    ) -> Self {
        let ttl = config.client.cache_ttl;
        let enricher = Enricher::new(details, Arc::new(TtlCache::new(ttl)));
        let status = StatusLookup::new(
            Aggregator::from_config(pages, &config.client),
            &config.client,
            Arc::new(TtlCache::new(ttl)),
        );

        Self {
            catalog: Arc::new(catalog),
            enricher: Arc::new(enricher),
            status: Arc::new(status),
            config: Arc::new(config),
        }
    }
}
