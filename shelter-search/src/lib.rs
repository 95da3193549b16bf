//! # shelter-search
//!
//! Federated keyword search across a shelter's record stores: animals,
//! people, animal-control incidents, lost and found reports, licences and
//! waiting-list entries.
//!
//! This crate owns the search logic only. Record storage, permission
//! lookups, translation and the clock are collaborators supplied by the
//! host through small traits.
//!
//! ## Query language
//!
//! - `sort:az`, `sort:za`, `sort:lr`, `sort:mr`, `sort:as`, `sort:sa`,
//!   `sort:rel` anywhere in the query override the default sort
//! - special keywords (`onshelter`/`os`, `hold`, `vets`, `activelost`, ...)
//!   run one canned lookup
//! - `a:`, `ac:`, `p:`, `wl:`, `la:`, `fa:`, `li:` (or their long forms)
//!   search a single source
//! - anything else searches every source the user may view
//!
//! ## Design
//!
//! - Each source is gated by a view capability; denied sources are skipped
//!   silently
//! - Permitted sources are queried concurrently and merged in a fixed order
//! - Relevance sorting uses synthetic timestamps so matches outrank
//!   recently-changed non-matches
//! - Null sort dates fall back to 1900-01-01 instead of failing
//! - Query text is logged only at trace level

pub mod clock;
pub mod config;
pub mod error;
pub mod locale;
pub mod orchestrator;
pub mod permission;
pub mod query;
pub mod session;
pub mod sort;
pub mod source;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{SearchConfig, SearchContext};
pub use error::{Result, SearchError};
pub use locale::{MessageCatalog, Translator};
pub use orchestrator::search::SearchServices;
pub use permission::{Capability, PermissionService, SessionCapabilities};
pub use query::{parse_query, Dispatch, ParsedQuery, SpecialSearch};
pub use session::Session;
pub use sort::SortMode;
pub use source::{FindRequest, PersonClass, RecordSource, ScopeFilters, SourceQuery};
pub use types::{FieldValue, Record, ResultType, SearchOutcome, SearchResult, SortKey};

/// Search every record store the session may view.
///
/// Parses `query`, dispatches to the permitted sources, merges and sorts
/// their records, and returns the results with the elapsed time, a
/// localized explanation and the localized sort label.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `context.config` is invalid. Any
/// error from a collaborator is returned unchanged. Empty results and
/// denied sources are not errors.
///
/// # Examples
///
/// ```no_run
/// # async fn example(source: &dyn shelter_search::RecordSource) -> shelter_search::Result<()> {
/// use shelter_search::{MessageCatalog, SearchContext, SearchServices, Session, SessionCapabilities, SystemClock};
///
/// let catalog = MessageCatalog::new();
/// let services = SearchServices {
///     source,
///     permissions: &SessionCapabilities,
///     translator: &catalog,
///     clock: &SystemClock,
/// };
/// let session = Session::superuser("admin");
/// let outcome = shelter_search::search(&SearchContext::default(), &session, "sort:mr la:fluffy", &services).await?;
/// println!("{} ({})", outcome.explain, outcome.sort_label);
/// # Ok(())
/// # }
/// ```
pub async fn search(
    context: &SearchContext,
    session: &Session,
    query: &str,
    services: &SearchServices<'_>,
) -> Result<SearchOutcome> {
    context.config.validate()?;
    orchestrator::search::orchestrate_search(context, session, query, services).await
}

/// Search with the default context and in-crate collaborators.
///
/// Convenience wrapper around [`search`] using [`SearchContext::default()`],
/// [`SessionCapabilities`], an English [`MessageCatalog`] and the
/// [`SystemClock`].
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_default(
    source: &dyn RecordSource,
    session: &Session,
    query: &str,
) -> Result<SearchOutcome> {
    let catalog = MessageCatalog::new();
    let services = SearchServices {
        source,
        permissions: &SessionCapabilities,
        translator: &catalog,
        clock: &SystemClock,
    };
    search(&SearchContext::default(), session, query, &services).await
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct EmptySource;

    #[async_trait]
    impl RecordSource for EmptySource {
        async fn find(&self, _request: &FindRequest) -> Result<Vec<Record>> {
            Ok(vec![])
        }
    }

    fn services<'a>(catalog: &'a MessageCatalog) -> SearchServices<'a> {
        SearchServices {
            source: &EmptySource,
            permissions: &SessionCapabilities,
            translator: catalog,
            clock: &SystemClock,
        }
    }

    #[tokio::test]
    async fn search_validates_config_zero_limit() {
        let catalog = MessageCatalog::new();
        let context = SearchContext::new(
            "en",
            SearchConfig {
                record_search_limit: 0,
                ..Default::default()
            },
        );
        let result = search(&context, &Session::default(), "rex", &services(&catalog)).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("record_search_limit"));
    }

    #[tokio::test]
    async fn no_results_is_not_an_error() {
        let outcome = search_default(&EmptySource, &Session::superuser("jo"), "nothing here")
            .await
            .expect("empty search should succeed");
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.explain, "Results for 'nothing here'.");
    }
}
