//! Configuration constants and the API client configuration.

use std::time::Duration;

use crate::error::{MagangError, Result};

/// Base URL of the MagangHub listing API.
pub const DEFAULT_API_BASE_URL: &str = "https://maganghub.kemnaker.go.id/be/v1/api/list";

/// Participant listing, filterable by `email` or `id_posisi`.
pub const PARTICIPANTS_PATH: &str = "crud-program-participants";

/// Active vacancy listing, filterable by `id_posisi`.
pub const VACANCIES_PATH: &str = "vacancies-aktif";

/// Public page of a single position.
pub const POSITION_VIEW_URL: &str = "https://maganghub.kemnaker.go.id/lowongan/view";

/// Timeout for interactive multi-record queries.
pub const INTERACTIVE_TIMEOUT_SECS: u64 = 15;

/// Timeout for cache-backed single-item lookups.
pub const LOOKUP_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound against runaway pagination.
pub const DEFAULT_MAX_PAGES: u32 = 1900;

/// Number of page fetches allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Build the public URL of a position.
pub fn position_view_url(position_id: &str) -> String {
    format!("{POSITION_VIEW_URL}/{position_id}")
}

/// Configuration for talking to the listing API.
///
/// NOTE: `api_token` is sent on every request. Keep it out of logs.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub lookup_timeout: Duration,
    pub page_size: u32,
    pub max_pages: u32,
    pub concurrency: usize,
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("lookup_timeout", &self.lookup_timeout)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("concurrency", &self.concurrency)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            api_token: None,
            timeout: Duration::from_secs(INTERACTIVE_TIMEOUT_SECS),
            lookup_timeout: Duration::from_secs(LOOKUP_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: DEFAULT_CONCURRENCY,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unparseable numbers are rejected rather
    /// than silently replaced by the default.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_base_url = std::env::var("MAGANGHUB_API_BASE_URL")
            .unwrap_or(defaults.api_base_url);

        let api_token = std::env::var("MAGANGHUB_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let timeout_secs = env_number("MAGANGHUB_TIMEOUT_SECS", INTERACTIVE_TIMEOUT_SECS)?;
        let lookup_timeout_secs = env_number("MAGANGHUB_LOOKUP_TIMEOUT_SECS", LOOKUP_TIMEOUT_SECS)?;
        let page_size = env_number("MAGANGHUB_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let max_pages = env_number("MAGANGHUB_MAX_PAGES", DEFAULT_MAX_PAGES)?;
        let concurrency = env_number("MAGANGHUB_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        let cache_ttl_secs = env_number("MAGANGHUB_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;

        let config = Self {
            api_base_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            lookup_timeout: Duration::from_secs(lookup_timeout_secs),
            page_size,
            max_pages,
            concurrency,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a config builder, mostly for tests pointing at a mock server.
    pub fn builder(api_base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self {
                api_base_url: api_base_url.into(),
                ..Self::default()
            },
        }
    }

    /// Reject values the aggregator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(MagangError::Config("page size must be at least 1".into()));
        }
        if self.max_pages == 0 {
            return Err(MagangError::Config("max pages must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(MagangError::Config("concurrency must be at least 1".into()));
        }
        Ok(())
    }

    pub fn participants_url(&self) -> String {
        self.endpoint(PARTICIPANTS_PATH)
    }

    pub fn vacancies_url(&self) -> String {
        self.endpoint(VACANCIES_PATH)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base_url.trim_end_matches('/'))
    }
}

fn env_number<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| MagangError::Config(format!("{name} is not a valid number: '{raw}'"))),
        Err(_) => Ok(default),
    }
}

/// Builder for constructing `ClientConfig` in tests and binaries.
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.config.lookup_timeout = timeout;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
