//! Core domain entities for the Code Registry subsystem.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, CodeValue, Plan, Timestamp};
use std::fmt;
use uuid::Uuid;

use super::errors::RedeemError;

/// What redeeming a code does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodePurpose {
    /// Binds an external identity to the issuing account.
    AccountLinking,
    /// Activates or extends the issuing account's subscription.
    SubscriptionActivation,
}

impl CodePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountLinking => "account_linking",
            Self::SubscriptionActivation => "subscription_activation",
        }
    }
}

impl fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeState {
    /// Issued, not yet used.
    Pending,
    /// Held by an in-flight redemption; resolves to `Redeemed` or back to `Pending`.
    Claimed { claimed_at: Timestamp },
    /// Terminal.
    Redeemed { redeemed_at: Timestamp },
}

/// Status as observed at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeStatus {
    Pending,
    Redeemed,
    Expired,
}

/// A single-use verification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Audit identifier, independent of the secret value.
    pub id: Uuid,
    pub value: CodeValue,
    pub purpose: CodePurpose,
    /// Account on whose behalf the code was issued.
    pub account_id: AccountId,
    /// Present for `SubscriptionActivation` codes only.
    pub plan: Option<Plan>,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub state: CodeState,
}

impl VerificationCode {
    /// Creates a pending code. A zero TTL is clamped to 1ms so that
    /// `expires_at > issued_at` always holds.
    pub fn new(
        value: CodeValue,
        purpose: CodePurpose,
        account_id: AccountId,
        plan: Option<Plan>,
        issued_at: Timestamp,
        ttl_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            purpose,
            account_id,
            plan,
            issued_at,
            expires_at: issued_at.saturating_add(ttl_ms.max(1)),
            state: CodeState::Pending,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Derived status. Expiry wins over any stored state.
    pub fn status(&self, now: Timestamp) -> CodeStatus {
        if self.is_expired(now) {
            return CodeStatus::Expired;
        }
        match self.state {
            CodeState::Redeemed { .. } => CodeStatus::Redeemed,
            CodeState::Pending | CodeState::Claimed { .. } => CodeStatus::Pending,
        }
    }

    pub fn redeemed_at(&self) -> Option<Timestamp> {
        match self.state {
            CodeState::Redeemed { redeemed_at } => Some(redeemed_at),
            _ => None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self.state, CodeState::Claimed { .. })
    }

    /// Checks that a redemption may start at `now`.
    ///
    /// Order: expiry first, then prior or in-flight redemption.
    pub fn check_redeemable(&self, now: Timestamp) -> Result<(), RedeemError> {
        if self.is_expired(now) {
            return Err(RedeemError::Expired {
                expires_at: self.expires_at,
            });
        }
        match self.state {
            CodeState::Pending => Ok(()),
            CodeState::Claimed { .. } | CodeState::Redeemed { .. } => {
                Err(RedeemError::AlreadyRedeemed)
            }
        }
    }

    /// Instant after which the retention window starts counting.
    pub fn retention_anchor(&self) -> Timestamp {
        self.redeemed_at()
            .map_or(self.expires_at, |r| r.max(self.expires_at))
    }
}
