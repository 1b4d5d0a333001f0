//! Immutable, validated search query values.
//!
//! The upstream form takes a free-text search term plus three enumerated
//! flags. [`SearchQuery`] validates once at construction and cannot be
//! mutated afterwards; [`MatchFlag`] and [`CepType`] make invalid flag
//! states unrepresentable. `FromStr` impls give the routing layer a
//! validated boundary for raw query-string values.

use crate::error::CepError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Yes/no flag as the upstream form encodes it (`S` = sim, `N` = não).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFlag {
    /// Enabled (`S`).
    S,
    /// Disabled (`N`).
    N,
}

impl MatchFlag {
    /// Returns the exact wire value sent in the form body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::N => "N",
        }
    }
}

impl fmt::Display for MatchFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchFlag {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::S),
            "N" => Ok(Self::N),
            other => Err(CepError::Validation(format!(
                "invalid match flag {other:?}, expected \"S\" or \"N\""
            ))),
        }
    }
}

/// Which kind of CEP entries to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CepType {
    /// Logradouro (street-level) entries.
    Log,
    /// Promotional CEPs.
    Pro,
    /// Community mailboxes (caixa postal comunitária).
    Cpc,
    /// Large receivers (grande usuário).
    Gru,
    /// No type filter.
    All,
}

impl CepType {
    /// Returns the exact wire value sent in the form body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "LOG",
            Self::Pro => "PRO",
            Self::Cpc => "CPC",
            Self::Gru => "GRU",
            Self::All => "ALL",
        }
    }

    /// Returns all accepted type-filter variants.
    pub fn all() -> &'static [CepType] {
        &[Self::Log, Self::Pro, Self::Cpc, Self::Gru, Self::All]
    }
}

impl fmt::Display for CepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CepType {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOG" => Ok(Self::Log),
            "PRO" => Ok(Self::Pro),
            "CPC" => Ok(Self::Cpc),
            "GRU" => Ok(Self::Gru),
            "ALL" => Ok(Self::All),
            other => Err(CepError::Validation(format!(
                "invalid CEP type {other:?}, expected one of LOG, PRO, CPC, GRU, ALL"
            ))),
        }
    }
}

/// An immutable address search query.
///
/// Constructed via [`SearchQuery::new`], which rejects empty search terms.
/// The flag fields default to the upstream form's defaults (`exata=S`,
/// `semelhante=N`, `tipoCep=ALL`) and can be overridden with the consuming
/// `with_*` builders. There is no mutation path after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    search: String,
    exact: MatchFlag,
    similar: MatchFlag,
    cep_type: CepType,
}

impl SearchQuery {
    /// Creates a query for `search` with default flags.
    ///
    /// # Errors
    ///
    /// Returns [`CepError::Validation`] if `search` is empty or whitespace.
    pub fn new(search: impl Into<String>) -> Result<Self, CepError> {
        let search = search.into();
        if search.trim().is_empty() {
            return Err(CepError::Validation(
                "search term must not be empty".into(),
            ));
        }
        Ok(Self {
            search,
            exact: MatchFlag::S,
            similar: MatchFlag::N,
            cep_type: CepType::All,
        })
    }

    /// Sets the exact-match flag (`exata`).
    #[must_use]
    pub fn with_exact(mut self, exact: MatchFlag) -> Self {
        self.exact = exact;
        self
    }

    /// Sets the similar-match flag (`semelhante`).
    #[must_use]
    pub fn with_similar(mut self, similar: MatchFlag) -> Self {
        self.similar = similar;
        self
    }

    /// Sets the type filter (`tipoCep`).
    #[must_use]
    pub fn with_cep_type(mut self, cep_type: CepType) -> Self {
        self.cep_type = cep_type;
        self
    }

    /// The search term.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The exact-match flag.
    pub fn exact(&self) -> MatchFlag {
        self.exact
    }

    /// The similar-match flag.
    pub fn similar(&self) -> MatchFlag {
        self.similar
    }

    /// The type filter.
    pub fn cep_type(&self) -> CepType {
        self.cep_type
    }
}
