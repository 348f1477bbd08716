//! Error types for the Zotero client.

use std::time::Duration;

/// Errors that can occur when interacting with the Zotero API.
#[derive(Debug, thiserror::Error)]
pub enum ZoteroError {
    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Zotero API returned an error status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// No API key provided.
    #[error("Authentication required: set ZOTERO_API_KEY environment variable or pass a key to ZoteroClient::new()")]
    AuthRequired,

    /// Rate limited by the Zotero API (HTTP 429).
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// A versioned write was rejected because the object changed upstream
    /// (HTTP 412).
    #[error("Version conflict (HTTP {status}): object was modified upstream, re-fetch and retry")]
    VersionConflict { status: u16 },

    /// Failed to parse an API response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A request parameter was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for Results using [`ZoteroError`].
pub type Result<T> = std::result::Result<T, ZoteroError>;
