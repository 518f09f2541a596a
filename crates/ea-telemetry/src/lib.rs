//! # Entitlement Telemetry
//!
//! Logging setup shared by the node binary and integration tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ea_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EA_SERVICE_NAME` | `entitlement-authority` | Service name in logs |
//! | `EA_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `EA_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `EA_LOG_THREAD_IDS` | `true` | Thread ids in output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to install log subscriber: {0}")]
    SubscriberInit(String),
}
