//! Headless search host for stdin/stdout JSON communication.
//!
//! Usage: `shelter-host [CONFIG.toml]`
//!
//! Reads `SearchRequest` lines from stdin and writes one `SearchResponse`
//! line per request to stdout. Without a config file the defaults apply and
//! records are loaded from `records.json` in the working directory.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use std::path::PathBuf;

use shelter::{HostConfig, SearchHost};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for the JSON protocol.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => HostConfig::from_file(&path)
            .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?,
        None => HostConfig::default(),
    };
    tracing::info!(
        locale = %config.locale,
        data_file = %config.data_file.display(),
        "shelter-host starting"
    );

    let host = SearchHost::from_config(&config)?;
    host.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "shelter-host exited with error");
            anyhow::anyhow!("shelter-host failed: {e}")
        })?;

    tracing::info!("shelter-host shut down cleanly");
    Ok(())
}
