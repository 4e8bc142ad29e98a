//! # Bitmask Telemetry
//!
//! Logging setup shared by the Bitmask tools. Library crates only emit
//! `tracing` events; binaries call [`init_logging`] once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bitmask_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::for_service("bitmask-cli"))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BITMASK_LOG_LEVEL` / `RUST_LOG` | `warn` | Log filter |
//! | `BITMASK_JSON_LOGS` | `false` | JSON lines instead of text |
//! | `NO_COLOR` | unset | Disable colours |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install log subscriber: {0}")]
    Init(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
