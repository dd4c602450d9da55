//! Error types for the MagangHub core.
//!
//! A single `MagangError` covers the remote API, response parsing and the
//! snapshot file. Partial aggregation is not an error; it is reported
//! through `AggregateOutcome::failed_pages`.

use thiserror::Error;

/// Main error type for the core library.
#[derive(Debug, Error)]
pub enum MagangError {
    /// The remote API answered with a non-2xx status.
    #[error("remote service error (status {status}): {body}")]
    RemoteService { status: u16, body: String },

    /// The response body was not the JSON shape we expect.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A targeted query returned no data.
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP transport failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failed outside of a response body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot CSV could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MagangError {
    /// Whether this error should be shown as an informational message rather
    /// than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, MagangError>;
