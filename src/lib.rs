//! # cep-search
//!
//! Scrapes the Correios CEP address search and assembles its paginated,
//! server-rendered HTML results into a single ordered record set.
//!
//! The upstream endpoint answers multipart form POSTs with ISO-8859-1 HTML
//! tables, 50 records per page, and fails often enough that every page
//! fetch carries a bounded retry with real backoff. This crate is a
//! library: the HTTP routing layer that exposes it as a service, and the
//! validation of raw query strings, live with the caller.
//!
//! ## Design
//!
//! - One blocking first fetch learns the total match count
//! - Remaining pages are fetched concurrently (unbounded by default, with
//!   an optional in-flight cap) and merged strictly in chunk order
//! - Per-page retry: 3 attempts with awaited exponential backoff
//! - Optional proxy routing for hosts that would otherwise get IP-banned
//!
//! ## Security
//!
//! - TLS trust relaxation, when explicitly enabled, is scoped to this
//!   crate's HTTP client only — never process-wide
//! - Query and proxy values are validated at construction, before any
//!   network traffic

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod orchestrator;
mod parse;
pub mod proxy;
pub mod query;
pub mod types;

pub use config::{CrawlerConfig, BASE_URL};
pub use error::{CepError, Result};
pub use fetch::{PageFetch, PageFetcher, PAGE_SIZE};
pub use proxy::ProxyAddress;
pub use query::{CepType, MatchFlag, SearchQuery};
pub use types::{AddressRecord, PageResult};

/// Search for addresses, fetching every results page.
///
/// Validates `config`, builds a [`PageFetcher`] (wiring in the configured
/// proxy and trust policy), and runs the orchestrator: first page, then a
/// concurrent fan-out over the remaining pages, merged in chunk order.
///
/// # Errors
///
/// Returns [`CepError::Config`] for an invalid configuration,
/// [`CepError::Fetch`] when any page exhausts its retries (all-or-nothing:
/// a single failed chunk fails the whole run).
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> cep_search::Result<()> {
/// let query = cep_search::SearchQuery::new("avenida paulista")?;
/// let config = cep_search::CrawlerConfig::default();
/// let records = cep_search::search(&query, &config).await?;
/// for record in &records {
///     println!("{}: {} - {}/{}", record.number, record.place, record.city, record.state);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &SearchQuery, config: &CrawlerConfig) -> Result<Vec<AddressRecord>> {
    config.validate()?;
    let fetcher = PageFetcher::new(config.clone())?;
    orchestrator::run(&fetcher, query, config).await
}

/// Search with default configuration from a bare term.
///
/// Convenience wrapper around [`search`] using [`SearchQuery::new`] and
/// [`CrawlerConfig::default()`].
///
/// # Errors
///
/// Returns [`CepError::Validation`] for an empty term; otherwise same as
/// [`search`].
pub async fn search_term(term: &str) -> Result<Vec<AddressRecord>> {
    let query = SearchQuery::new(term)?;
    search(&query, &CrawlerConfig::default()).await
}
