//! Entitlement Service - Core business logic

use std::sync::Arc;

use ea_01_code_registry::{
    CodeGenerator, CodeIssuanceApi, CodeIssuer, CodePurpose, CodeRegistryConfig, CodeStore,
    InMemoryCodeStore, IssueRequest, VerificationCode,
};
use ea_02_linkage_registry::{InMemoryLinkageRegistry, LinkError, LinkageRegistry};
use serde::{Deserialize, Serialize};
use shared_types::{
    AccountId, CodeValue, ExternalIdentity, StoreError, SubscriptionLevel, TimeSource, Timestamp,
};
use tracing::{error, info, warn};

use crate::adapters::InMemorySubscriptionRepository;
use crate::domain::{
    ActivationResult, InactiveReason, LinkResult, SubscriptionRecord, SubscriptionSnapshot,
};
use crate::error::{EntitlementError, EntitlementResult};
use crate::metrics;
use crate::ports::{EntitlementApi, MaintenanceReport, SubscriptionRepository};

/// Where a fresh subscription period starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodAnchor {
    /// When the activation code was issued (the purchase time).
    #[default]
    Issuance,
    /// When the code was redeemed.
    Activation,
}

/// Entitlement configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitlementConfig {
    pub period_anchor: PeriodAnchor,
}

/// Entitlement Service implementation
///
/// Coordinates the code store, the linkage registry and the subscription
/// repository. Redemption uses the store's claim / confirm / release
/// protocol so that a failed side effect never consumes the code.
pub struct EntitlementService {
    config: EntitlementConfig,
    issuer: Arc<dyn CodeIssuanceApi>,
    codes: Arc<dyn CodeStore>,
    linkages: Arc<dyn LinkageRegistry>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    time_source: Arc<dyn TimeSource>,
}

impl EntitlementService {
    pub fn new(
        config: EntitlementConfig,
        issuer: Arc<dyn CodeIssuanceApi>,
        codes: Arc<dyn CodeStore>,
        linkages: Arc<dyn LinkageRegistry>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            issuer,
            codes,
            linkages,
            subscriptions,
            time_source,
        }
    }

    /// Service over in-memory adapters.
    pub fn in_memory(
        config: EntitlementConfig,
        code_config: CodeRegistryConfig,
        generator: Arc<dyn CodeGenerator>,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        let codes: Arc<dyn CodeStore> = Arc::new(InMemoryCodeStore::new(&code_config));
        let issuer = Arc::new(CodeIssuer::new(
            Arc::clone(&codes),
            generator,
            Arc::clone(&time_source),
            code_config,
        ));
        Self::new(
            config,
            issuer,
            codes,
            Arc::new(InMemoryLinkageRegistry::new()),
            Arc::new(InMemorySubscriptionRepository::new()),
            time_source,
        )
    }

    pub fn config(&self) -> &EntitlementConfig {
        &self.config
    }

    pub fn code_store(&self) -> &Arc<dyn CodeStore> {
        &self.codes
    }

    /// Validates a stored code for `purpose` and claims it.
    ///
    /// Check order: not found, expired, already redeemed, wrong purpose. The
    /// store repeats the first three atomically inside `claim`.
    fn claim_for(
        &self,
        value: &CodeValue,
        purpose: CodePurpose,
        now: Timestamp,
    ) -> EntitlementResult<VerificationCode> {
        let stored = self.codes.get(value).ok_or(EntitlementError::CodeNotFound)?;
        stored.check_redeemable(now)?;
        if stored.purpose != purpose {
            return Err(EntitlementError::WrongPurpose {
                expected: purpose,
                actual: stored.purpose,
            });
        }
        Ok(self.codes.claim(value, now)?)
    }

    /// Commits a claim after the side effect succeeded.
    ///
    /// Claims are only released by their own redemption, so a failed confirm
    /// means the store lost the record. The code is burned if it reappeared as
    /// Pending, and the caller gets `ClaimLost` rather than a success.
    fn commit_claim(&self, value: &CodeValue, now: Timestamp) -> EntitlementResult<()> {
        let Err(err) = self.codes.confirm(value, now) else {
            return Ok(());
        };
        error!(
            code = %value.redacted(),
            error = %err,
            "Side effect applied but the claim was lost"
        );
        if let Err(burn) = self.codes.mark_redeemed(value, now) {
            warn!(code = %value.redacted(), error = %burn, "Lost claim could not be burned");
        }
        Err(EntitlementError::ClaimLost)
    }

    fn rollback_claim(&self, value: &CodeValue) {
        if let Err(err) = self.codes.release(value) {
            warn!(code = %value.redacted(), error = %err, "Claim release failed");
        }
    }

    fn period_start(&self, code: &VerificationCode, now: Timestamp) -> Timestamp {
        match self.config.period_anchor {
            PeriodAnchor::Issuance => code.issued_at,
            PeriodAnchor::Activation => now,
        }
    }

    fn snapshot_for(
        &self,
        account_id: &AccountId,
        now: Timestamp,
    ) -> EntitlementResult<SubscriptionSnapshot> {
        Ok(self
            .subscriptions
            .get(account_id)?
            .map_or_else(SubscriptionSnapshot::not_activated, |record| {
                SubscriptionSnapshot::from_record(&record, now)
            }))
    }

    fn try_activate(&self, code: &str, now: Timestamp) -> EntitlementResult<ActivationResult> {
        let value = CodeValue::parse(code)?;
        let claimed = self.claim_for(&value, CodePurpose::SubscriptionActivation, now)?;

        let Some(plan) = claimed.plan else {
            self.rollback_claim(&value);
            return Err(EntitlementError::PlanMissing);
        };
        let period_start = self.period_start(&claimed, now);
        let account_id = claimed.account_id.clone();

        let written = self.subscriptions.update(&account_id, &|current| {
            Some(SubscriptionRecord::activated(
                current,
                &account_id,
                &plan,
                &value,
                period_start,
                now,
            ))
        });

        let record = match written {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.rollback_claim(&value);
                return Err(StoreError::Unavailable("subscription write was dropped".into()).into());
            }
            Err(err) => {
                warn!(code = %value.redacted(), error = %err, "Subscription write failed, releasing code");
                self.rollback_claim(&value);
                return Err(err.into());
            }
        };

        self.commit_claim(&value, now)?;

        info!(
            account_id = %account_id,
            level = %record.level,
            expiration_date = ?record.expiration_date,
            "Subscription activated"
        );
        metrics::record_activation(record.level.as_str());

        Ok(ActivationResult {
            account_id,
            code: value,
            snapshot: SubscriptionSnapshot::from_record(&record, now),
        })
    }

    fn try_redeem_for_linking(
        &self,
        code: &str,
        external_identity: &ExternalIdentity,
        now: Timestamp,
    ) -> EntitlementResult<LinkResult> {
        let value = CodeValue::parse(code)?;
        let claimed = self.claim_for(&value, CodePurpose::AccountLinking, now)?;

        match self.linkages.link(external_identity, &claimed.account_id, now) {
            Ok(linkage) => {
                self.commit_claim(&value, now)?;
                Ok(LinkResult::Linked { linkage })
            }
            Err(LinkError::AlreadyLinked { existing_account }) => {
                self.rollback_claim(&value);
                Ok(LinkResult::AlreadyLinked { existing_account })
            }
            Err(LinkError::AccountAlreadyLinked { existing_identity }) => {
                self.rollback_claim(&value);
                Ok(LinkResult::AccountAlreadyLinked { existing_identity })
            }
            Err(LinkError::Storage(err)) => {
                self.rollback_claim(&value);
                Err(err.into())
            }
        }
    }
}

impl EntitlementApi for EntitlementService {
    fn issue_code(&self, request: IssueRequest) -> EntitlementResult<VerificationCode> {
        let code = self.issuer.issue(request)?;
        metrics::record_code_issued(code.purpose.as_str());
        Ok(code)
    }

    fn activate(&self, code: &str) -> EntitlementResult<ActivationResult> {
        let now = self.time_source.now();
        let result = self.try_activate(code, now);
        match &result {
            Ok(_) => metrics::record_redemption("activation", "success"),
            Err(err) => {
                info!(reason = err.kind(), "Activation rejected");
                metrics::record_redemption("activation", err.kind());
            }
        }
        result
    }

    fn check_status(&self, code: &str) -> EntitlementResult<SubscriptionSnapshot> {
        let value = CodeValue::parse(code)?;
        let now = self.time_source.now();

        if let Some(record) = self.subscriptions.find_by_code(&value)? {
            return Ok(SubscriptionSnapshot::from_record(&record, now));
        }

        let code = self.codes.get(&value).ok_or(EntitlementError::CodeNotFound)?;
        if code.is_expired(now) {
            Ok(SubscriptionSnapshot::inactive(InactiveReason::Expired))
        } else {
            Ok(SubscriptionSnapshot::not_activated())
        }
    }

    fn redeem_for_linking(
        &self,
        code: &str,
        external_identity: &ExternalIdentity,
    ) -> EntitlementResult<LinkResult> {
        let now = self.time_source.now();
        let result = self.try_redeem_for_linking(code, external_identity, now);
        match &result {
            Ok(outcome) => {
                info!(identity = %external_identity, outcome = outcome.as_str(), "Linking code redeemed");
                metrics::record_redemption("linking", outcome.as_str());
            }
            Err(err) => {
                info!(identity = %external_identity, reason = err.kind(), "Linking rejected");
                metrics::record_redemption("linking", err.kind());
            }
        }
        result
    }

    fn revoke(&self, account_id: &AccountId) -> EntitlementResult<SubscriptionSnapshot> {
        let now = self.time_source.now();
        let record = self
            .subscriptions
            .update(account_id, &|current| current.map(|r| r.revoked(now)))?
            .ok_or_else(|| EntitlementError::AccountNotFound {
                account_id: account_id.clone(),
            })?;

        info!(account_id = %account_id, "Subscription revoked");
        Ok(SubscriptionSnapshot::from_record(&record, now))
    }

    fn subscription_for(&self, account_id: &AccountId) -> EntitlementResult<SubscriptionSnapshot> {
        self.snapshot_for(account_id, self.time_source.now())
    }

    fn has_entitlement(
        &self,
        account_id: &AccountId,
        required: SubscriptionLevel,
    ) -> EntitlementResult<bool> {
        Ok(self.subscription_for(account_id)?.grants(required))
    }

    fn status_for_identity(
        &self,
        external_identity: &ExternalIdentity,
    ) -> EntitlementResult<SubscriptionSnapshot> {
        let account_id = self.linkages.resolve(external_identity).ok_or_else(|| {
            EntitlementError::IdentityNotLinked {
                identity: external_identity.clone(),
            }
        })?;
        self.subscription_for(&account_id)
    }

    fn linked_account(&self, external_identity: &ExternalIdentity) -> Option<AccountId> {
        self.linkages.resolve(external_identity)
    }

    fn linked_identity(&self, account_id: &AccountId) -> Option<ExternalIdentity> {
        self.linkages.identity_for(account_id)
    }

    fn run_maintenance(&self) -> EntitlementResult<MaintenanceReport> {
        let now = self.time_source.now();
        let codes = self.codes.sweep_expired(now);
        let deactivated = self.subscriptions.deactivate_expired(now)?;

        for account_id in &deactivated {
            info!(account_id = %account_id, "Subscription expired");
        }
        metrics::record_maintenance(codes.evicted, deactivated.len());

        Ok(MaintenanceReport {
            codes,
            subscriptions_deactivated: deactivated.len(),
        })
    }
}
