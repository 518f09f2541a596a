//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Defaults are usable as-is for local development. `load_config()` layers
//! `EA_*` environment overrides on top:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `EA_HTTP_HOST` / `EA_HTTP_PORT` | `gateway.http` |
//! | `EA_ACCOUNT_HEADER` | `gateway.account_header` |
//! | `EA_CORS_PERMISSIVE` | `gateway.cors_permissive` |
//! | `EA_OPERATOR_TOKEN` | `gateway.operator_token` (enables the admin routes) |
//! | `EA_OPERATOR_HEADER` | `gateway.operator_header` |
//! | `EA_LINKING_TTL_SECS` | `codes.linking_ttl_ms` |
//! | `EA_ACTIVATION_TTL_SECS` | `codes.activation_ttl_ms` |
//! | `EA_RETENTION_DAYS` | `codes.retention_ms` |
//! | `EA_MAX_CODES` | `codes.max_codes` |
//! | `EA_PERIOD_ANCHOR` | `entitlement.period_anchor` (`issuance` / `activation`) |
//! | `EA_SWEEP_INTERVAL_SECS` | `maintenance.sweep_interval_secs` |
//!
//! Unparseable values are logged and ignored.

use ea_01_code_registry::CodeRegistryConfig;
use ea_03_entitlement::{EntitlementConfig, PeriodAnchor};
use ea_04_api_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use shared_types::{DAY_MS, SECOND_MS};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Code issuance and storage.
    pub codes: CodeRegistryConfig,
    /// Subscription activation rules.
    pub entitlement: EntitlementConfig,
    /// HTTP gateway.
    pub gateway: GatewayConfig,
    /// Background sweeper.
    pub maintenance: MaintenanceConfig,
}

/// Background maintenance configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Seconds between sweeps of codes and expired subscriptions.
    pub sweep_interval_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
        }
    }
}

impl MaintenanceConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("code registry: {0}")]
    Codes(#[from] ea_01_code_registry::ConfigError),

    #[error("gateway: {0}")]
    Gateway(#[from] ea_04_api_gateway::ConfigError),

    #[error("sweep_interval_secs cannot be 0")]
    InvalidSweepInterval,
}

impl NodeConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.codes.validate()?;
        self.gateway.validate()?;
        if self.maintenance.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidSweepInterval);
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = parse_var(&lookup, "EA_HTTP_HOST") {
            self.gateway.http.host = host;
        }
        if let Some(port) = parse_var(&lookup, "EA_HTTP_PORT") {
            self.gateway.http.port = port;
        }
        if let Some(header) = lookup("EA_ACCOUNT_HEADER") {
            self.gateway.account_header = header.trim().to_ascii_lowercase();
        }
        if let Some(cors) = parse_var(&lookup, "EA_CORS_PERMISSIVE") {
            self.gateway.cors_permissive = cors;
        }
        if let Some(token) = lookup("EA_OPERATOR_TOKEN") {
            let token = token.trim();
            if token.is_empty() {
                warn!("EA_OPERATOR_TOKEN is empty, admin routes stay disabled");
            } else {
                self.gateway.operator_token = Some(token.to_string());
            }
        }
        if let Some(header) = lookup("EA_OPERATOR_HEADER") {
            self.gateway.operator_header = header.trim().to_ascii_lowercase();
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, "EA_LINKING_TTL_SECS") {
            self.codes.linking_ttl_ms = secs.saturating_mul(SECOND_MS);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "EA_ACTIVATION_TTL_SECS") {
            self.codes.activation_ttl_ms = secs.saturating_mul(SECOND_MS);
        }
        if let Some(days) = parse_var::<u64, _>(&lookup, "EA_RETENTION_DAYS") {
            self.codes.retention_ms = days.saturating_mul(DAY_MS);
        }
        if let Some(max) = parse_var(&lookup, "EA_MAX_CODES") {
            self.codes.max_codes = max;
        }

        if let Some(anchor) = lookup("EA_PERIOD_ANCHOR") {
            match anchor.trim().to_ascii_lowercase().as_str() {
                "issuance" => self.entitlement.period_anchor = PeriodAnchor::Issuance,
                "activation" => self.entitlement.period_anchor = PeriodAnchor::Activation,
                other => warn!(value = other, "EA_PERIOD_ANCHOR must be issuance or activation"),
            }
        }

        if let Some(secs) = parse_var(&lookup, "EA_SWEEP_INTERVAL_SECS") {
            self.maintenance.sweep_interval_secs = secs;
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparseable override");
            None
        }
    }
}

/// Load configuration from defaults and the process environment.
pub fn load_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.apply_overrides(|name| std::env::var(name).ok());
    config
}
