//! Newline-delimited JSON search bridge.
//!
//! Each input line is a [`SearchRequest`]; each output line is the matching
//! [`SearchResponse`]. Malformed lines and failed searches produce an error
//! response and the bridge keeps reading. The bridge exits on EOF.
//!
//! Stdout is reserved for the protocol; diagnostics go through `tracing`.

use serde::{Deserialize, Serialize};
use shelter_search::{
    Clock, MessageCatalog, SearchContext, SearchOutcome, SearchResult, SearchServices, Session,
    SessionCapabilities, SystemClock,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::HostConfig;
use crate::error::{HostError, Result};
use crate::fixtures::JsonRecordSource;

/// One search request line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Echoed back on the response.
    #[serde(default)]
    pub id: Option<String>,
    pub query: String,
    #[serde(default)]
    pub session: Session,
}

/// Successful search payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    pub results: Vec<SearchResult>,
    pub elapsed_seconds: f64,
    pub explain: String,
    pub sort_label: String,
}

impl From<SearchOutcome> for SearchPayload {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            results: outcome.results,
            elapsed_seconds: outcome.elapsed.as_secs_f64(),
            explain: outcome.explain,
            sort_label: outcome.sort_label,
        }
    }
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SearchPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn ok(id: Option<String>, payload: SearchPayload) -> Self {
        Self {
            id,
            ok: true,
            result: Some(payload),
            error: None,
        }
    }

    pub fn error(id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(message.into()),
        }
    }
}

/// Everything one host process needs to answer searches.
pub struct SearchHost {
    context: SearchContext,
    source: JsonRecordSource,
    catalog: MessageCatalog,
    clock: Box<dyn Clock>,
}

impl SearchHost {
    pub fn new(config: &HostConfig, source: JsonRecordSource) -> Self {
        Self {
            context: config.search_context(),
            source,
            catalog: config.catalog(),
            clock: Box::new(SystemClock),
        }
    }

    /// Load the fixture store named by `config.data_file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture file cannot be read or parsed.
    pub fn from_config(config: &HostConfig) -> Result<Self> {
        let source = JsonRecordSource::from_file(&config.data_file)?;
        Ok(Self::new(config, source))
    }

    /// Replace the clock used for relevance timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Answer one request.
    pub async fn handle(&self, request: SearchRequest) -> SearchResponse {
        let services = SearchServices {
            source: &self.source,
            permissions: &SessionCapabilities,
            translator: &self.catalog,
            clock: self.clock.as_ref(),
        };
        match shelter_search::search(&self.context, &request.session, &request.query, &services)
            .await
        {
            Ok(outcome) => SearchResponse::ok(request.id, outcome.into()),
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                SearchResponse::error(request.id, e.to_string())
            }
        }
    }

    /// Read requests from `reader` until EOF, writing one response per line.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading or writing the streams fails.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<SearchRequest>(trimmed) {
                Ok(request) => self.handle(request).await,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse search request");
                    SearchResponse::error(None, format!("failed to parse search request: {e}"))
                }
            };
            write_line(&mut writer, &response).await?;
        }
        tracing::info!("input closed (EOF); shutting down search bridge");
        Ok(())
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, response: &SearchResponse) -> Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| HostError::Protocol(format!("failed to serialize response: {e}")))?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
