//! Gateway configuration with validation.

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::error::ConfigError;

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Allow any origin (browser form served from another host)
    pub cors_permissive: bool,
    /// Header carrying the authenticated caller's account id, set by the
    /// upstream auth proxy
    pub account_header: String,
    /// Shared secret for the operator routes (activation codes, revocation).
    /// Those routes are not mounted while this is `None`.
    pub operator_token: Option<String>,
    /// Header carrying the operator token
    pub operator_header: String,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: IpAddr,
    /// `0` binds an ephemeral port
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            request_timeout_ms: 10_000,
            cors_permissive: false,
            account_header: "x-account-id".to_string(),
            operator_token: None,
            operator_header: "x-operator-token".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(
                "request_timeout_ms cannot be 0".into(),
            ));
        }

        for header in [&self.account_header, &self.operator_header] {
            if HeaderName::from_bytes(header.as_bytes()).is_err() {
                return Err(ConfigError::InvalidHeader(header.clone()));
            }
        }

        if self.operator_token.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyOperatorToken);
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
