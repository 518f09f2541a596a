//! Inbound (Driving) ports for the Entitlement subsystem.
//!
//! These traits define the public API that external callers (HTTP gateway,
//! chat bot adapter, maintenance task) use to interact with entitlements.

use ea_01_code_registry::{IssueRequest, SweepReport, VerificationCode};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, ExternalIdentity, SubscriptionLevel};

use crate::domain::{ActivationResult, LinkResult, SubscriptionSnapshot};
use crate::error::EntitlementResult;

/// Result of one maintenance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceReport {
    pub codes: SweepReport,
    pub subscriptions_deactivated: usize,
}

/// Primary Entitlement API.
///
/// Code arguments are raw user input; implementations normalize them.
pub trait EntitlementApi: Send + Sync {
    /// Issues a code on behalf of an account.
    fn issue_code(&self, request: IssueRequest) -> EntitlementResult<VerificationCode>;

    /// Redeems a subscription activation code.
    ///
    /// Either the code is redeemed and the subscription updated, or neither.
    ///
    /// # Errors
    /// `InvalidCode`, `CodeNotFound`, `CodeExpired`, `CodeAlreadyRedeemed`,
    /// `WrongPurpose`, or `Storage`.
    fn activate(&self, code: &str) -> EntitlementResult<ActivationResult>;

    /// Entitlement keyed by an activation code.
    ///
    /// Inactive states are reported in the snapshot, not as errors. Only an
    /// unknown code is an error.
    fn check_status(&self, code: &str) -> EntitlementResult<SubscriptionSnapshot>;

    /// Redeems an account linking code for `external_identity`.
    ///
    /// Link conflicts are returned as `LinkResult` variants and leave the
    /// code redeemable.
    fn redeem_for_linking(
        &self,
        code: &str,
        external_identity: &ExternalIdentity,
    ) -> EntitlementResult<LinkResult>;

    /// Manually revokes an account's subscription.
    fn revoke(&self, account_id: &AccountId) -> EntitlementResult<SubscriptionSnapshot>;

    /// Entitlement of an account. No record reads as not activated.
    fn subscription_for(&self, account_id: &AccountId) -> EntitlementResult<SubscriptionSnapshot>;

    /// Whether the account currently has at least `required`.
    fn has_entitlement(
        &self,
        account_id: &AccountId,
        required: SubscriptionLevel,
    ) -> EntitlementResult<bool>;

    /// Entitlement of the account linked to `external_identity`.
    fn status_for_identity(
        &self,
        external_identity: &ExternalIdentity,
    ) -> EntitlementResult<SubscriptionSnapshot>;

    fn linked_account(&self, external_identity: &ExternalIdentity) -> Option<AccountId>;

    fn linked_identity(&self, account_id: &AccountId) -> Option<ExternalIdentity>;

    /// Evicts old codes and deactivates expired subscriptions.
    fn run_maintenance(&self) -> EntitlementResult<MaintenanceReport>;
}
