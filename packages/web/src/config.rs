use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use maganghub_core::catalog::CATALOG_PAGE_SIZE;
use maganghub_core::{ClientConfig, MagangError, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/posisi.csv";

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_addr: SocketAddr,
    pub snapshot_path: PathBuf,
    pub page_size: usize,
    pub client: ClientConfig,
}

impl WebConfig {
    /// Read `BIND_ADDR`, `SNAPSHOT_PATH`, `CATALOG_PAGE_SIZE` and the
    /// `MAGANGHUB_*` client settings.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|_| MagangError::Config(format!("BIND_ADDR is not a socket address: '{bind_addr}'")))?;

        let snapshot_path = env::var("SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SNAPSHOT_PATH));

        let page_size = match env::var("CATALOG_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    MagangError::Config(format!("CATALOG_PAGE_SIZE must be a positive number: '{raw}'"))
                })?,
            Err(_) => CATALOG_PAGE_SIZE,
        };

        let client = ClientConfig::from_env()?;
        client.validate()?;

        if client.api_token.is_none() {
            tracing::warn!("MAGANGHUB_API_TOKEN is not set, status lookups will likely be rejected");
        }

        Ok(Self {
            bind_addr,
            snapshot_path,
            page_size,
            client,
        })
    }

    /// Config for tests: snapshot from `snapshot_path`, API at `client`.
    pub fn new(snapshot_path: impl Into<PathBuf>, client: ClientConfig) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            snapshot_path: snapshot_path.into(),
            page_size: CATALOG_PAGE_SIZE,
            client,
        }
    }
}
