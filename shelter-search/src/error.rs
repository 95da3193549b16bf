//! Error types for the shelter-search crate.
//!
//! The search core itself only ever raises [`SearchError::Config`]. Every
//! other variant exists so that collaborators (record sources, the
//! permission service, the translator) can report failures that propagate
//! unmodified to the caller.

/// Errors that can occur during a search call.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A record source failed to produce its records.
    #[error("source error: {0}")]
    Source(String),

    /// The permission service could not answer a capability check.
    #[error("permission error: {0}")]
    Permission(String),

    /// The translator could not render a message.
    #[error("translation error: {0}")]
    Translation(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for shelter-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
