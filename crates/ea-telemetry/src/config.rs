//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log filter directive (e.g. `info`, `ea_03_entitlement=debug,info`)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Include the module target in each line
    pub with_target: bool,

    /// Include the thread id in each line
    pub with_thread_ids: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "entitlement-authority".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_target: true,
            with_thread_ids: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EA_SERVICE_NAME`: Service name (default: entitlement-authority)
    /// - `EA_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `EA_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `EA_LOG_THREAD_IDS`: Include thread ids (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("EA_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("EA_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("EA_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            with_target: defaults.with_target,

            with_thread_ids: lookup("EA_LOG_THREAD_IDS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.with_thread_ids),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
