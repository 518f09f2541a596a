//! Configuration for code issuance and storage.

use serde::{Deserialize, Serialize};
use shared_types::{DAY_MS, HOUR_MS, MINUTE_MS};

use super::entities::CodePurpose;
use super::errors::ConfigError;

/// Code Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeRegistryConfig {
    /// Lifetime of account linking codes.
    pub linking_ttl_ms: u64,
    /// Lifetime of subscription activation codes.
    pub activation_ttl_ms: u64,
    /// How long expired or redeemed codes stay queryable before eviction.
    pub retention_ms: u64,
    /// Maximum number of stored codes (all states).
    pub max_codes: usize,
    /// Regeneration attempts on value collision before giving up.
    pub max_generation_attempts: u32,
}

impl Default for CodeRegistryConfig {
    fn default() -> Self {
        Self {
            linking_ttl_ms: 10 * MINUTE_MS,
            activation_ttl_ms: 24 * HOUR_MS,
            retention_ms: 7 * DAY_MS,
            max_codes: 100_000,
            max_generation_attempts: 8,
        }
    }
}

impl CodeRegistryConfig {
    /// Small limits for unit tests.
    pub fn for_testing() -> Self {
        Self {
            max_codes: 100,
            ..Self::default()
        }
    }

    pub fn ttl_for(&self, purpose: CodePurpose) -> u64 {
        match purpose {
            CodePurpose::AccountLinking => self.linking_ttl_ms,
            CodePurpose::SubscriptionActivation => self.activation_ttl_ms,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.linking_ttl_ms == 0 {
            return Err(ConfigError::InvalidTtl(
                "linking_ttl_ms cannot be 0".into(),
            ));
        }
        if self.activation_ttl_ms == 0 {
            return Err(ConfigError::InvalidTtl(
                "activation_ttl_ms cannot be 0".into(),
            ));
        }
        if self.max_codes == 0 {
            return Err(ConfigError::InvalidLimit("max_codes cannot be 0".into()));
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_generation_attempts cannot be 0".into(),
            ));
        }
        Ok(())
    }
}
