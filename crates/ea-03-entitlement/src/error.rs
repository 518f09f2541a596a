//! Error types for the Entitlement subsystem

use ea_01_code_registry::{CodePurpose, IssuanceError, RedeemError};
use shared_types::{AccountId, CodeFormatError, ExternalIdentity, StoreError, Timestamp};
use thiserror::Error;

/// Entitlement subsystem errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementError {
    /// Input could not be parsed as a code
    #[error("Invalid code: {0}")]
    InvalidCode(#[from] CodeFormatError),

    /// No code with this value is stored
    #[error("Code not found")]
    CodeNotFound,

    /// Code is past its expiry
    #[error("Code expired at {expires_at}")]
    CodeExpired { expires_at: Timestamp },

    /// Code was already used (or is being used by a concurrent request)
    #[error("Code already redeemed")]
    CodeAlreadyRedeemed,

    /// Code was issued for a different flow
    #[error("Code is for {actual}, expected {expected}")]
    WrongPurpose {
        expected: CodePurpose,
        actual: CodePurpose,
    },

    /// Activation code carries no plan
    #[error("Activation code has no plan attached")]
    PlanMissing,

    /// No subscription record for the account
    #[error("No subscription for account {account_id}")]
    AccountNotFound { account_id: AccountId },

    /// External identity has no linked account
    #[error("External identity {identity} is not linked")]
    IdentityNotLinked { identity: ExternalIdentity },

    /// Side effect applied, but the claim was gone at confirm time.
    /// The code is burned; the caller must not treat this as success.
    #[error("Redemption claim lost before commit")]
    ClaimLost,

    /// Code issuance failed
    #[error("Issuance failed: {0}")]
    Issuance(#[from] IssuanceError),

    /// Persistence failure; not retried here
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl EntitlementError {
    /// Expected outcomes that callers render to users, as opposed to
    /// failures of the request itself.
    pub fn is_steady_state(&self) -> bool {
        !matches!(
            self,
            Self::Storage(_)
                | Self::Issuance(IssuanceError::Storage(_))
                | Self::ClaimLost
                | Self::PlanMissing
        )
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCode(_) => "invalid_code",
            Self::CodeNotFound => "not_found",
            Self::CodeExpired { .. } => "expired",
            Self::CodeAlreadyRedeemed => "already_redeemed",
            Self::WrongPurpose { .. } => "wrong_purpose",
            Self::PlanMissing => "plan_missing",
            Self::AccountNotFound { .. } => "account_not_found",
            Self::IdentityNotLinked { .. } => "identity_not_linked",
            Self::ClaimLost => "claim_lost",
            Self::Issuance(_) => "issuance",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<RedeemError> for EntitlementError {
    fn from(err: RedeemError) -> Self {
        match err {
            RedeemError::NotFound => Self::CodeNotFound,
            RedeemError::Expired { expires_at } => Self::CodeExpired { expires_at },
            RedeemError::AlreadyRedeemed => Self::CodeAlreadyRedeemed,
            RedeemError::NotClaimed => Self::ClaimLost,
        }
    }
}

/// Result type for entitlement operations
pub type EntitlementResult<T> = Result<T, EntitlementError>;
