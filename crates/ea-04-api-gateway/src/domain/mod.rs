//! Gateway domain: configuration, wire types and errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{GatewayConfig, HttpConfig};
pub use error::{ApiError, ConfigError, GatewayError};
pub use types::*;
