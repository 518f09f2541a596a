//! Code issuance with collision retry.

use std::sync::Arc;

use shared_types::{AccountId, Plan, StoreError, TimeSource};
use tracing::{debug, info, warn};

use super::config::CodeRegistryConfig;
use super::entities::{CodePurpose, VerificationCode};
use super::errors::{IssuanceError, IssuanceResult};
use crate::ports::{CodeGenerator, CodeIssuanceApi, CodeStore};

/// Parameters for one issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub purpose: CodePurpose,
    pub account_id: AccountId,
    pub plan: Option<Plan>,
    /// Overrides the purpose's configured TTL.
    pub ttl_ms: Option<u64>,
}

impl IssueRequest {
    pub fn linking(account_id: AccountId) -> Self {
        Self {
            purpose: CodePurpose::AccountLinking,
            account_id,
            plan: None,
            ttl_ms: None,
        }
    }

    pub fn activation(account_id: AccountId, plan: Plan) -> Self {
        Self {
            purpose: CodePurpose::SubscriptionActivation,
            account_id,
            plan: Some(plan),
            ttl_ms: None,
        }
    }

    pub fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }
}

/// Issues codes into a [`CodeStore`].
pub struct CodeIssuer {
    store: Arc<dyn CodeStore>,
    generator: Arc<dyn CodeGenerator>,
    time_source: Arc<dyn TimeSource>,
    config: CodeRegistryConfig,
}

impl CodeIssuer {
    pub fn new(
        store: Arc<dyn CodeStore>,
        generator: Arc<dyn CodeGenerator>,
        time_source: Arc<dyn TimeSource>,
        config: CodeRegistryConfig,
    ) -> Self {
        Self {
            store,
            generator,
            time_source,
            config,
        }
    }

    pub fn config(&self) -> &CodeRegistryConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CodeStore> {
        &self.store
    }
}

impl CodeIssuanceApi for CodeIssuer {
    fn issue(&self, request: IssueRequest) -> IssuanceResult<VerificationCode> {
        match (request.purpose, &request.plan) {
            (CodePurpose::SubscriptionActivation, None) => {
                return Err(IssuanceError::MissingPlan)
            }
            (CodePurpose::AccountLinking, Some(_)) => return Err(IssuanceError::PlanNotAllowed),
            _ => {}
        }

        let ttl_ms = request
            .ttl_ms
            .unwrap_or_else(|| self.config.ttl_for(request.purpose));
        let now = self.time_source.now();
        let attempts = self.config.max_generation_attempts;

        for attempt in 1..=attempts {
            let value = self.generator.generate()?;
            let code = VerificationCode::new(
                value,
                request.purpose,
                request.account_id.clone(),
                request.plan,
                now,
                ttl_ms,
            );

            match self.store.insert(code.clone()) {
                Ok(()) => {
                    info!(
                        code_id = %code.id,
                        code = %code.value.redacted(),
                        purpose = %code.purpose,
                        account_id = %code.account_id,
                        expires_at = code.expires_at,
                        "Issued verification code"
                    );
                    return Ok(code);
                }
                Err(StoreError::DuplicateCode) => {
                    debug!(attempt, "Code value collision, regenerating");
                }
                Err(e) => {
                    warn!(error = %e, purpose = %request.purpose, "Code store rejected issuance");
                    return Err(e.into());
                }
            }
        }

        warn!(attempts, "Exhausted code generation attempts");
        Err(IssuanceError::CollisionsExhausted { attempts })
    }
}
