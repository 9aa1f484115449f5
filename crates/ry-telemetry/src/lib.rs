//! # Real You Telemetry
//!
//! Structured logging shared by every binary in the workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ry_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RY_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `RY_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `RY_SERVICE_NAME` | `real-you` | Service name |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install subscriber: {0}")]
    Init(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
