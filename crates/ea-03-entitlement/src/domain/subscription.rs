//! Subscription records and their transitions.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, CodeValue, Plan, SubscriptionLevel, Timestamp};

use super::snapshot::InactiveReason;

/// Per-account subscription state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub account_id: AccountId,
    pub level: SubscriptionLevel,
    /// Cleared by the expiry sweep and by revocation.
    pub is_active: bool,
    /// `None` never expires.
    pub expiration_date: Option<Timestamp>,
    /// Most recent code that activated or extended this record.
    pub activation_code: Option<CodeValue>,
    pub activated_at: Timestamp,
    pub updated_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

impl SubscriptionRecord {
    /// Applies a redeemed activation code to the current record, if any.
    ///
    /// - No record, or a record that is not active at `now`: a fresh period
    ///   starting at `period_start` with the plan's level.
    /// - Active record: the plan's duration stacks on the current expiration
    ///   and the level becomes the higher of the two. A lifetime plan (or a
    ///   lifetime record) stays lifetime.
    pub fn activated(
        current: Option<&SubscriptionRecord>,
        account_id: &AccountId,
        plan: &Plan,
        code: &CodeValue,
        period_start: Timestamp,
        now: Timestamp,
    ) -> Self {
        match current {
            Some(existing) if existing.is_active_at(now) => {
                let expiration_date = match (existing.expiration_date, plan.duration_ms) {
                    (Some(current_end), Some(extra)) => Some(current_end.saturating_add(extra)),
                    _ => None,
                };
                Self {
                    level: existing.level.max(plan.level),
                    expiration_date,
                    activation_code: Some(code.clone()),
                    updated_at: now,
                    ..existing.clone()
                }
            }
            _ => Self {
                account_id: account_id.clone(),
                level: plan.level,
                is_active: true,
                expiration_date: plan.expiration_from(period_start),
                activation_code: Some(code.clone()),
                activated_at: now,
                updated_at: now,
                revoked_at: None,
            },
        }
    }

    pub fn revoked(&self, now: Timestamp) -> Self {
        Self {
            is_active: false,
            revoked_at: Some(now),
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiration_date.is_some_and(|end| now > end)
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the record grants access at `now`. Expiry is checked here, so
    /// a record the sweep has not reached yet still reads as inactive.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.is_active && !self.is_revoked() && !self.is_expired(now)
    }

    /// Why the record does not grant access, or `None` if it does.
    pub fn inactive_reason(&self, now: Timestamp) -> Option<InactiveReason> {
        if self.is_revoked() {
            Some(InactiveReason::Revoked)
        } else if self.is_expired(now) {
            Some(InactiveReason::Expired)
        } else if !self.is_active {
            Some(InactiveReason::NotActivated)
        } else {
            None
        }
    }
}
