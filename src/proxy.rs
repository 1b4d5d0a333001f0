//! Validated proxy address values.
//!
//! Mass queries against the upstream can get an IP banned, so fetches may be
//! routed through an HTTP(S) proxy. [`ProxyAddress`] accepts only
//! `scheme://host[:port]` with an http or https scheme; anything else is
//! rejected at construction, before any network call is attempted.

use crate::error::CepError;
use std::fmt;
use std::str::FromStr;

/// A validated `scheme://host[:port]` proxy address.
///
/// Construction is the only validation point; a held value is always
/// well-formed. Convert with [`ProxyAddress::to_proxy`] when wiring the
/// HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAddress(String);

impl ProxyAddress {
    /// Parses and validates a proxy address.
    ///
    /// Accepts `http://host`, `https://host`, and either with a `:port`
    /// suffix in the valid port range. Userinfo, paths, query strings and
    /// fragments are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CepError::Validation`] for any other shape, e.g. `ftp://x`
    /// or `http://x:99999999`.
    pub fn parse(address: &str) -> Result<Self, CepError> {
        let invalid = || CepError::Validation(format!("invalid proxy address {address:?}"));

        let parsed = url::Url::parse(address).map_err(|_| invalid())?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid());
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid());
        }
        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(invalid());
        }
        // Url normalises an absent path to "/"; anything longer was explicit.
        if parsed.path().len() > 1 || parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid());
        }

        Ok(Self(address.trim_end_matches('/').to_string()))
    }

    /// The validated address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts into a [`reqwest::Proxy`] covering all outbound traffic of
    /// this crate's client.
    ///
    /// # Errors
    ///
    /// Returns [`CepError::Http`] if reqwest rejects the address; with a
    /// validated value this does not happen in practice.
    pub fn to_proxy(&self) -> Result<reqwest::Proxy, CepError> {
        reqwest::Proxy::all(self.as_str())
            .map_err(|e| CepError::Http(format!("failed to configure proxy: {e}")))
    }
}

impl fmt::Display for ProxyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxyAddress {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
