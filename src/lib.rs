//! Shelter search host.
//!
//! Embeds `shelter-search` behind a TOML configuration, a JSON fixture
//! record store and a newline-delimited JSON bridge on stdin/stdout.

pub mod bridge;
pub mod config;
pub mod error;
pub mod fixtures;

pub use bridge::{SearchHost, SearchPayload, SearchRequest, SearchResponse};
pub use config::HostConfig;
pub use error::{HostError, Result};
pub use fixtures::JsonRecordSource;
