//! HTTP client construction for upstream page requests.
//!
//! Provides a configured [`reqwest::Client`] with gzip transfer, optional
//! proxy routing, and a trust policy scoped to this client only.

use crate::config::CrawlerConfig;
use crate::error::CepError;
use std::time::Duration;

/// Build a [`reqwest::Client`] configured for the CEP search endpoint.
///
/// The client has:
/// - Gzip decompression (the upstream sends noticeably smaller bodies)
/// - Timeout from config
/// - Proxy routing when `config.proxy` is set
/// - `danger_accept_invalid_certs` only when `config.accept_invalid_certs`
///   is set; the trust policy never leaks to other clients in the process
///
/// # Errors
///
/// Returns [`CepError::Http`] if the client cannot be constructed.
pub fn build_client(config: &CrawlerConfig) -> Result<reqwest::Client, CepError> {
    let mut builder = reqwest::Client::builder()
        .gzip(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(ref proxy) = config.proxy {
        builder = builder.proxy(proxy.to_proxy()?);
    }
    if let Some(ref ua) = config.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    if config.accept_invalid_certs {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| CepError::Http(format!("failed to build HTTP client: {e}")))
}
