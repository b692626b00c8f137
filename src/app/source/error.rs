//! Error types for the album data source.

use thiserror::Error;

/// Failures while fetching album data or artwork.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Body was not the JSON shape we expect
    #[error("Failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Base URL or resource reference could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The page that started the request was closed
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Result type for data source operations.
pub type Result<T> = std::result::Result<T, FetchError>;
