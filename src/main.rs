//! MRU Session - A document session driven by JSON-line commands
//!
//! Reads one command per line from stdin and writes one JSON response per
//! line to stdout. Logs go to stderr.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mru_collections::session::{handle_line, SessionState};
use mru_collections::{spawn_stats_reporter, Config};

/// Main entry point for the document session.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the document cache and recent list
/// 4. Start background stats reporter
/// 5. Serve stdin commands until EOF or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mru_collections=info,mru_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting MRU document session");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_capacity={}, recent_limit={}, report_interval={}s",
        config.max_capacity, config.recent_limit, config.report_interval
    );

    let state = SessionState::from_config(&config).context("invalid configuration")?;

    let reporter = spawn_stats_reporter(state.documents.clone(), config.report_interval);
    info!("Background stats reporter started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read command")? else {
                    info!("Input closed, shutting down...");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let response = handle_line(&state, &line).await;
                stdout.write_all(response.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, initiating shutdown...");
                break;
            }
        }
    }

    reporter.abort();
    warn!("Stats reporter aborted");

    // Close whatever is still open
    state.documents.with(|cache| cache.clear()).await;
    info!("Session shutdown complete");

    Ok(())
}
