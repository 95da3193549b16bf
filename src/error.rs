//! Error types for the shelter host.

use shelter_search::SearchError;

/// Top-level error type for the host process.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration file could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Record fixture file is malformed.
    #[error("fixture error: {0}")]
    Fixture(String),

    /// Request or response line could not be (de)serialized.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the search core.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, HostError>;
