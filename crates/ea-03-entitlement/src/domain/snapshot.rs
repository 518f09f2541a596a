//! Query results returned to callers.

use ea_02_linkage_registry::Linkage;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, CodeValue, ExternalIdentity, SubscriptionLevel, Timestamp};

use super::subscription::SubscriptionRecord;

/// Why a status query reports no access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InactiveReason {
    NotActivated,
    Expired,
    Revoked,
}

impl InactiveReason {
    /// User-facing text.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotActivated => "Subscription has not been activated",
            Self::Expired => "Subscription has expired",
            Self::Revoked => "Subscription has been revoked",
        }
    }
}

/// Entitlement state at a point in time.
///
/// `is_active == true` implies `level.is_some()` and `reason.is_none()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    pub is_active: bool,
    pub level: Option<SubscriptionLevel>,
    pub expiration_date: Option<Timestamp>,
    pub reason: Option<InactiveReason>,
}

impl SubscriptionSnapshot {
    pub fn not_activated() -> Self {
        Self::inactive(InactiveReason::NotActivated)
    }

    pub fn inactive(reason: InactiveReason) -> Self {
        Self {
            is_active: false,
            level: None,
            expiration_date: None,
            reason: Some(reason),
        }
    }

    /// Level and expiration are only reported while the record grants access.
    pub fn from_record(record: &SubscriptionRecord, now: Timestamp) -> Self {
        match record.inactive_reason(now) {
            Some(reason) => Self::inactive(reason),
            None => Self {
                is_active: true,
                level: Some(record.level),
                expiration_date: record.expiration_date,
                reason: None,
            },
        }
    }

    /// Feature gate: active and at or above `required`.
    pub fn grants(&self, required: SubscriptionLevel) -> bool {
        self.is_active && self.level.is_some_and(|level| level.satisfies(required))
    }
}

/// Successful activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationResult {
    pub account_id: AccountId,
    pub code: CodeValue,
    pub snapshot: SubscriptionSnapshot,
}

/// Outcome of redeeming a linking code.
///
/// Conflicts are results, not errors, so the bot can tell the user which
/// side is already bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkResult {
    Linked { linkage: Linkage },
    AlreadyLinked { existing_account: AccountId },
    AccountAlreadyLinked { existing_identity: ExternalIdentity },
}

impl LinkResult {
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linked { .. } => "linked",
            Self::AlreadyLinked { .. } => "already_linked",
            Self::AccountAlreadyLinked { .. } => "account_already_linked",
        }
    }
}
