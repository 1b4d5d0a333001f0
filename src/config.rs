//! Crawler configuration with sensible defaults.
//!
//! [`CrawlerConfig`] controls the upstream endpoint, proxy routing, timeouts,
//! retry count, and fan-out behaviour. The defaults match the upstream
//! service's real address and the retry policy it needs in practice.

use crate::error::CepError;
use crate::proxy::ProxyAddress;

/// Base URL of the upstream CEP search service.
pub const BASE_URL: &str = "http://www.buscacep.correios.com.br";

/// Configuration for a crawl run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Base URL of the upstream service. Overridable for test servers.
    pub base_url: String,
    /// Optional proxy every page request is routed through.
    pub proxy: Option<ProxyAddress>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Attempts per page fetch before giving up (first try included).
    pub retry_attempts: u32,
    /// Cap on simultaneous in-flight page fetches. `None` fans out one task
    /// per remaining page, which is the upstream-unfriendly historical
    /// behaviour; set a cap when crawling large result sets.
    pub max_concurrency: Option<usize>,
    /// Custom User-Agent string. `None` uses reqwest's default.
    pub user_agent: Option<String>,
    /// Accept invalid TLS certificates on this crate's client only. Never
    /// affects other clients in the process.
    pub accept_invalid_certs: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            proxy: None,
            timeout_seconds: 30,
            retry_attempts: 3,
            max_concurrency: None,
            user_agent: None,
            accept_invalid_certs: false,
        }
    }
}

impl CrawlerConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` must be a valid absolute URL
    /// - `timeout_seconds` must be greater than 0
    /// - `retry_attempts` must be greater than 0
    /// - `max_concurrency`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), CepError> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(CepError::Config(format!(
                "base_url {:?} is not a valid URL",
                self.base_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(CepError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.retry_attempts == 0 {
            return Err(CepError::Config(
                "retry_attempts must be greater than 0".into(),
            ));
        }
        if self.max_concurrency == Some(0) {
            return Err(CepError::Config(
                "max_concurrency must be greater than 0 when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = CrawlerConfig::default();
        assert_eq!(config.base_url, BASE_URL);
        assert!(config.proxy.is_none());
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.retry_attempts, 3);
        assert!(config.max_concurrency.is_none());
        assert!(config.user_agent.is_none());
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(CrawlerConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_base_url_rejected() {
        let config = CrawlerConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = CrawlerConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn zero_retry_attempts_rejected() {
        let config = CrawlerConfig {
            retry_attempts: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retry_attempts"));
    }

    #[test]
    fn zero_concurrency_cap_rejected() {
        let config = CrawlerConfig {
            max_concurrency: Some(0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrency"));
    }

    #[test]
    fn concurrency_cap_of_one_valid() {
        let config = CrawlerConfig {
            max_concurrency: Some(1),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_with_proxy_valid() {
        let config = CrawlerConfig {
            proxy: Some(ProxyAddress::parse("http://proxy.internal:8080").expect("valid")),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
