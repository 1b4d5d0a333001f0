//! Single-page fetching with bounded retry and backoff.
//!
//! [`PageFetcher`] submits the upstream search form for one page window,
//! decodes the ISO-8859-1 response, and delegates extraction to the parser.
//! Transient failures (transport errors, non-2xx statuses, structural parse
//! failures) all consume one retry attempt; the backoff between attempts is
//! a real awaited delay that never blocks sibling fetch tasks.

use crate::config::CrawlerConfig;
use crate::error::CepError;
use crate::http;
use crate::parse;
use crate::query::SearchQuery;
use crate::types::PageResult;
use std::future::Future;
use std::time::Duration;

/// Number of records requested per upstream results page.
pub const PAGE_SIZE: u64 = 50;

/// Path of the address search form handler, relative to the base URL.
const SEARCH_PATH: &str = "/sistemas/buscacep/ResultadoBuscaCepEndereco.cfm";

/// A page-fetching backend.
///
/// The orchestrator is generic over this trait so tests can drive it with
/// a synthetic fetcher. Implementations must be `Send + Sync` because page
/// fetches run as concurrent tasks.
pub trait PageFetch: Send + Sync {
    /// Fetch the results page starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`CepError::Fetch`] once all retry attempts are exhausted.
    fn fetch(
        &self,
        query: &SearchQuery,
        offset: u64,
    ) -> impl Future<Output = Result<PageResult, CepError>> + Send;
}

/// The production page fetcher: one HTTP form submission per page.
pub struct PageFetcher {
    client: reqwest::Client,
    config: CrawlerConfig,
}

impl PageFetcher {
    /// Builds a fetcher with a client configured from `config` (proxy,
    /// timeout, trust policy).
    ///
    /// # Errors
    ///
    /// Returns [`CepError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: CrawlerConfig) -> Result<Self, CepError> {
        let client = http::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// The form endpoint URL for this fetcher's base URL.
    fn endpoint(&self) -> String {
        format!("{}{SEARCH_PATH}", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the multipart form body for the page window
    /// `[offset+1, offset+PAGE_SIZE]`.
    fn form(query: &SearchQuery, offset: u64) -> reqwest::multipart::Form {
        reqwest::multipart::Form::new()
            .text("relaxation", query.search().to_string())
            .text("exata", query.exact().as_str())
            .text("semelhante", query.similar().as_str())
            .text("tipoCep", query.cep_type().as_str())
            .text("qtdrow", PAGE_SIZE.to_string())
            .text("pagini", (offset + 1).to_string())
            .text("pagfim", (offset + PAGE_SIZE).to_string())
    }

    /// One fetch attempt: POST the form, decode, parse.
    async fn fetch_once(&self, query: &SearchQuery, offset: u64) -> Result<PageResult, CepError> {
        let response = self
            .client
            .post(self.endpoint())
            .multipart(Self::form(query, offset))
            .send()
            .await
            .map_err(|e| CepError::Http(format!("search request failed: {e}")))?
            .error_for_status()
            .map_err(|e| CepError::Http(format!("search HTTP error: {e}")))?;

        // The upstream serves ISO-8859-1; decoding as UTF-8 would mangle
        // the diacritics in address names.
        let html = response
            .text_with_charset("iso-8859-1")
            .await
            .map_err(|e| CepError::Http(format!("response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), offset, "results page received");

        parse::parse_page(&html, offset)
    }
}

impl PageFetch for PageFetcher {
    async fn fetch(&self, query: &SearchQuery, offset: u64) -> Result<PageResult, CepError> {
        let url = self.endpoint();
        with_retries(self.config.retry_attempts, |attempt| {
            tracing::debug!(url = %url, offset, attempt, "fetching results page");
            self.fetch_once(query, offset)
        })
        .await
    }
}

/// Run `op` up to `attempts` times, sleeping `2^attempt` seconds between
/// attempts (1s, 2s, …). No delay follows the final failure; exhaustion
/// surfaces as `Fetch("list of products")`, the per-attempt causes having
/// been logged at warn level.
async fn with_retries<T, F, Fut>(attempts: u32, mut op: F) -> Result<T, CepError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, CepError>>,
{
    for attempt in 0..attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(attempt, error = %err, "fetch attempt failed");
                if attempt + 1 < attempts {
                    tokio::time::sleep(backoff_delay(attempt)).await;
                }
            }
        }
    }
    Err(CepError::Fetch("list of products".into()))
}

/// Backoff after failed attempt `attempt`: `2^attempt` seconds.
fn backoff_delay(attempt: u32) -> Duration {
    let shift = attempt.min(63);
    Duration::from_secs(1u64.checked_shl(shift).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn backoff_shift_is_capped() {
        assert_eq!(backoff_delay(200), Duration::from_secs(1u64 << 63));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retries(3, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7u64) }
        })
        .await;
        assert_eq!(result.expect("should succeed"), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fails_twice_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_retries(3, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(CepError::Http("flaky upstream".into()))
                } else {
                    Ok("page")
                }
            }
        })
        .await;
        assert_eq!(result.expect("third attempt should succeed"), "page");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn three_failures_exhaust_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retries(3, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CepError::Parse("summary element missing".into())) }
        })
        .await;
        let err = result.unwrap_err();
        assert!(matches!(err, CepError::Fetch(_)));
        assert_eq!(err.to_string(), "fetch error: list of products");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_delays_actually_elapse() {
        // 3 attempts → sleeps of 1s and 2s between them.
        let started = Instant::now();
        let result: Result<(), _> =
            with_retries(3, |_| async { Err(CepError::Http("down".into())) }).await;
        assert!(result.is_err());
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn no_delay_after_final_attempt() {
        let started = Instant::now();
        let _: Result<(), _> =
            with_retries(1, |_| async { Err(CepError::Http("down".into())) }).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[test]
    fn fetcher_construction_with_default_config() {
        let fetcher = PageFetcher::new(CrawlerConfig::default());
        assert!(fetcher.is_ok());
    }

    #[test]
    fn endpoint_joins_base_url_and_path() {
        let fetcher = PageFetcher::new(CrawlerConfig::default()).expect("fetcher");
        assert_eq!(
            fetcher.endpoint(),
            "http://www.buscacep.correios.com.br/sistemas/buscacep/ResultadoBuscaCepEndereco.cfm"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = CrawlerConfig {
            base_url: "http://localhost:8080/".into(),
            ..Default::default()
        };
        let fetcher = PageFetcher::new(config).expect("fetcher");
        assert_eq!(
            fetcher.endpoint(),
            "http://localhost:8080/sistemas/buscacep/ResultadoBuscaCepEndereco.cfm"
        );
    }
}
