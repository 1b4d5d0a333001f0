//! Error types for the cep-search crate.
//!
//! All errors use stable string messages suitable for display to callers
//! and programmatic handling. The routing layer maps `Validation` to a
//! client error and everything else to a server error.

/// Errors that can occur while crawling the CEP search endpoint.
#[derive(Debug, thiserror::Error)]
pub enum CepError {
    /// A query or proxy value failed construction-time validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// All retry attempts for a page fetch were exhausted.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// An HTTP request failed or returned a non-2xx status. Retried
    /// internally; surfaces only when a client cannot be constructed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body lacked the expected structural elements
    /// (results table or summary count). Consumes a retry attempt.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid crawler configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for cep-search results.
pub type Result<T> = std::result::Result<T, CepError>;
