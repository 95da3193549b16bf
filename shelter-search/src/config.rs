//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] carries the shelter-wide search settings: the record
//! cap applied to every source, the sort used when a query has no
//! directive, and the long-term threshold quoted in explanations.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::sort::SortMode;

/// Shelter-wide search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum records requested from, and kept per, source lookup.
    pub record_search_limit: usize,
    /// Sort applied when the query carries no `sort:` directive.
    pub default_sort: SortMode,
    /// Months after which an animal counts as long-term.
    pub long_term_months: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            record_search_limit: 100,
            default_sort: SortMode::Relevance,
            long_term_months: 6,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `record_search_limit` must be greater than 0
    /// - `long_term_months` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.record_search_limit == 0 {
            return Err(SearchError::Config(
                "record_search_limit must be greater than 0".into(),
            ));
        }
        if self.long_term_months == 0 {
            return Err(SearchError::Config(
                "long_term_months must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Per-call context: locale plus configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    /// Locale used for explanation and sort-label messages.
    pub locale: String,
    pub config: SearchConfig,
}

impl SearchContext {
    pub fn new(locale: impl Into<String>, config: SearchConfig) -> Self {
        Self {
            locale: locale.into(),
            config,
        }
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new("en", SearchConfig::default())
    }
}
