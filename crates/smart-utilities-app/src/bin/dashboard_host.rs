//! Replay host for the headless dashboard core.
//!
//! Reads one JSON [`InboundMessage`] per line (from `--input` or stdin),
//! feeds each through [`DashboardCore`], sends the resulting intents through
//! a transport that only logs them, and prints the final dashboard view.
//! Sends run on their own tasks; outcomes are folded back between lines.
//! Useful for reproducing a captured session without the game client.

use std::io::Cursor;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use serde_json::{json, Value};
use smart_utilities_app::types::InboundMessage;
use smart_utilities_app::{
    send_all, DashboardConfig, DashboardCore, MemorySurface, SendOutcome, Transport,
    TransportError,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "dashboard-host")]
#[command(about = "Replay a smart utilities message log through the dashboard core", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Message log, one JSON message per line (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Acknowledges every request after logging it.
struct LoggingTransport;

#[async_trait]
impl Transport for LoggingTransport {
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, TransportError> {
        tracing::info!(endpoint, body = %body, "outbound request");
        Ok(json!({ "ok": true }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    let log_filter = if cli.verbose {
        "debug"
    } else {
        config.log_filter.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .init();

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &cli.input {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading message log {}", path.display()))?;
            Box::new(Cursor::new(bytes))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let started = Instant::now();
    let elapsed_ms = || u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut core = DashboardCore::new(config, MemorySurface::new(), LoggingTransport);
    let (outcomes_tx, mut outcomes) = mpsc::unbounded_channel::<SendOutcome>();
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut acknowledged = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        while let Ok((intent, result)) = outcomes.try_recv() {
            acknowledged += usize::from(core.record_outcome(&intent, &result));
        }
        if line.trim().is_empty() {
            continue;
        }
        let message: InboundMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(line = line_no, error = %err, "skipping malformed message");
                continue;
            }
        };
        let follow_ups = core.handle(&message);
        if follow_ups.is_empty() {
            continue;
        }
        let requests = core.follow_up_requests(follow_ups, elapsed_ms());
        let tx = outcomes_tx.clone();
        tokio::spawn(async move {
            for outcome in send_all(requests).await {
                // The receiver outlives every sender.
                let _ = tx.send(outcome);
            }
        });
    }

    drop(outcomes_tx);
    while let Some((intent, result)) = outcomes.recv().await {
        acknowledged += usize::from(core.record_outcome(&intent, &result));
    }

    let expired = core.expire_requests(elapsed_ms());
    tracing::info!(
        messages = line_no,
        acknowledged,
        pending = core.gateway().pending().len(),
        expired,
        "replay finished"
    );

    println!("{}", serde_json::to_string_pretty(&core.render())?);
    Ok(())
}
