//! ledger-relay CLI
//!
//! Runs one relay pass over a batch of transport envelopes read from a JSON
//! file, publishing notifications to the log. Intended for local runs and
//! replaying captured stream batches.
//!
//! Usage:
//!   # Topic from the environment
//!   NOTIFICATION_TOPIC=registration-topic ledger-relay batch.json
//!
//!   # Topic from the command line
//!   ledger-relay --topic registration-topic batch.json

use clap::Parser;
use ledger_relay::{Envelope, Relay, RelayConfig, StdoutPublisher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ledger-relay", about = "Journal-stream notification relay")]
struct Cli {
    /// JSON file containing the envelope batch
    batch: PathBuf,

    /// Destination topic (overrides NOTIFICATION_TOPIC)
    #[arg(long)]
    topic: Option<String>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ledger_relay::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match cli.topic {
        Some(topic) => RelayConfig::new(topic)?,
        None => RelayConfig::from_env()?,
    };

    let raw = std::fs::read_to_string(&cli.batch)?;
    let batch: Vec<Envelope> = serde_json::from_str(&raw)?;

    let relay = Relay::new(config, Arc::new(StdoutPublisher));
    let result = relay.process(&batch).await;
    tracing::info!(status = result.status_code, "batch processed");

    Ok(())
}
