//! # Real You Node
//!
//! The main entry point for the Real You backend.
//!
//! ## Commands
//!
//! - `serve` (default) - run the HTTP gateway until Ctrl+C
//! - `broadcast --tag <label>` - notify every subscriber of one tag, retrying
//!   each failure once, then exit
//!
//! All settings come from `RY_*` environment variables; see
//! [`node_runtime::NodeConfig::from_env`].

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use node_runtime::{NodeConfig, NodeRuntime, DEFAULT_BROADCAST_RETRY_DELAY};
use ry_telemetry::{init_logging, TelemetryConfig};

#[derive(Parser, Debug)]
#[command(name = "real-you-node", version, about = "Real You backend node")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP gateway
    Serve,
    /// Notify every subscriber of a tag once
    Broadcast {
        /// Tag label, e.g. "Food" or "Art & Fashion"
        #[arg(long)]
        tag: String,
        /// Wait before retrying a failed delivery, in milliseconds
        #[arg(long, default_value_t = DEFAULT_BROADCAST_RETRY_DELAY.as_millis() as u64)]
        retry_delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let telemetry = TelemetryConfig::from_env();
    init_logging(&telemetry).context("Failed to initialize logging")?;
    info!(service = %telemetry.service_name, "Logging initialized");

    // Load configuration
    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    let runtime = NodeRuntime::new(config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            runtime.serve(shutdown_signal()).await?;
        }
        Command::Broadcast {
            tag,
            retry_delay_ms,
        } => {
            runtime
                .broadcast(&tag, Duration::from_millis(retry_delay_ms))
                .await?;
        }
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Initiating graceful shutdown..."),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
