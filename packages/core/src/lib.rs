//! MagangHub core - aggregate, enrich and score internship listings.
//!
//! This crate talks to the MagangHub listing API, merges paginated
//! collections, overlays live counters onto a cached snapshot and estimates
//! the chance of being accepted for a position.
//!
//! # Example
//!
//! ```
//! use maganghub_core::probability::{acceptance_probability, percent_label};
//!
//! assert_eq!(acceptance_probability(10, 7), 1.0);
//! assert_eq!(percent_label(acceptance_probability(10, 20)), "50%");
//! ```
//!
//! # Architecture
//!
//! - [`fetcher`]: one page (or one detail item) from the API
//! - [`aggregator`]: bounded-concurrency fetch of every page of a query
//! - [`pagination`]: normalization of the two pagination response shapes
//! - [`probability`]: acceptance probability model
//! - [`cache`]: TTL cache injected into the lookup flows
//! - [`enrichment`]: live counters over snapshot records
//! - [`status`]: email-based application status lookup
//! - [`snapshot`]: snapshot CSV persistence
//! - [`catalog`]: filtering and paging over the snapshot
//! - [`collect`]: building a snapshot from the vacancy listing

pub mod aggregator;
pub mod cache;
pub mod catalog;
pub mod collect;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod fetcher;
mod json;
pub mod models;
pub mod pagination;
pub mod probability;
pub mod snapshot;
pub mod status;

pub use aggregator::{AggregateOutcome, Aggregator, PageFailure};
pub use cache::TtlCache;
pub use catalog::{Catalog, CatalogPage, ListingQuery};
pub use config::ClientConfig;
pub use enrichment::Enricher;
pub use error::{MagangError, Result};
pub use fetcher::{ApiClient, DetailSource, Page, PageRequest, PageSource};
pub use models::{ApplicationStatusRow, ListingRecord, LiveCounters, SelectionStatus};
pub use status::{StatusLookup, StatusReport};
