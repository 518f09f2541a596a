//! Error types for the Code Registry subsystem.

use shared_types::{CodeFormatError, StoreError, Timestamp};
use thiserror::Error;

/// Outcomes of a rejected redemption step.
///
/// `NotFound`, `Expired` and `AlreadyRedeemed` are steady-state results that
/// callers render to users. `NotClaimed` indicates a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedeemError {
    #[error("Code not found")]
    NotFound,

    #[error("Code expired at {expires_at}")]
    Expired { expires_at: Timestamp },

    #[error("Code already redeemed")]
    AlreadyRedeemed,

    /// `confirm` or `release` on a code that is not held by a claim.
    #[error("Code is not claimed")]
    NotClaimed,
}

/// Failures while issuing a new code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssuanceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Generator produced an invalid code: {0}")]
    Generator(#[from] CodeFormatError),

    #[error("Could not generate a unique code after {attempts} attempts")]
    CollisionsExhausted { attempts: u32 },

    #[error("Subscription activation codes require a plan")]
    MissingPlan,

    #[error("Account linking codes cannot carry a plan")]
    PlanNotAllowed,
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}

pub type RedeemResult<T> = Result<T, RedeemError>;
pub type IssuanceResult<T> = Result<T, IssuanceError>;
