//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `AccountId`, `ExternalIdentity`
//! - **Codes**: `CodeValue`
//! - **Subscriptions**: `SubscriptionLevel`, `Plan`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CodeFormatError, UnknownLevel};
use crate::time::{Timestamp, DAY_MS};

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Internal account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity on an external platform (e.g. a chat handle such as
/// `discordUser#1234`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalIdentity(String);

impl ExternalIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CLUSTER B: CODES
// =============================================================================

/// A normalized verification code.
///
/// Input is trimmed and upper-cased so `"abc123 "` and `"ABC123"` address the
/// same record. Only ASCII alphanumerics and `-` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CodeValue(String);

impl CodeValue {
    pub const MIN_LEN: usize = 4;
    pub const MAX_LEN: usize = 64;

    /// Normalizes and validates user input.
    pub fn parse(input: &str) -> Result<Self, CodeFormatError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CodeFormatError::Empty);
        }

        let len = trimmed.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(CodeFormatError::Length {
                len,
                min: Self::MIN_LEN,
                max: Self::MAX_LEN,
            });
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(CodeFormatError::InvalidCharacter(bad));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix-only form for log lines. Codes are bearer secrets.
    pub fn redacted(&self) -> String {
        let visible: String = self.0.chars().take(3).collect();
        format!("{visible}***")
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CodeValue {
    type Err = CodeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CodeValue {
    type Error = CodeFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CodeValue> for String {
    fn from(value: CodeValue) -> Self {
        value.0
    }
}

// =============================================================================
// CLUSTER C: SUBSCRIPTIONS
// =============================================================================

/// Subscription tier. Declaration order is the entitlement order:
/// `Basic < Standard < Premium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionLevel {
    Basic,
    Standard,
    Premium,
}

impl SubscriptionLevel {
    pub const ALL: [SubscriptionLevel; 3] = [Self::Basic, Self::Standard, Self::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Standard => "STANDARD",
            Self::Premium => "PREMIUM",
        }
    }

    /// Default paid period for this tier.
    pub fn default_duration_ms(&self) -> u64 {
        match self {
            Self::Basic | Self::Standard => 30 * DAY_MS,
            Self::Premium => 90 * DAY_MS,
        }
    }

    /// True when this tier unlocks features gated at `required`.
    pub fn satisfies(&self, required: SubscriptionLevel) -> bool {
        *self >= required
    }
}

impl fmt::Display for SubscriptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "STANDARD" => Ok(Self::Standard),
            "PREMIUM" => Ok(Self::Premium),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// What a subscription activation code grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub level: SubscriptionLevel,
    /// Length of the granted period. `None` never expires.
    pub duration_ms: Option<u64>,
}

impl Plan {
    /// Plan with the tier's default period.
    pub fn for_level(level: SubscriptionLevel) -> Self {
        Self {
            level,
            duration_ms: Some(level.default_duration_ms()),
        }
    }

    pub fn with_duration(level: SubscriptionLevel, duration_ms: u64) -> Self {
        Self {
            level,
            duration_ms: Some(duration_ms),
        }
    }

    pub fn lifetime(level: SubscriptionLevel) -> Self {
        Self {
            level,
            duration_ms: None,
        }
    }

    /// End of a period starting at `start`, or `None` for lifetime plans.
    pub fn expiration_from(&self, start: Timestamp) -> Option<Timestamp> {
        self.duration_ms.map(|d| start.saturating_add(d))
    }
}
