//! Outbound (Driven) ports for the Code Registry subsystem.
//!
//! These traits define dependencies on external systems that the Code
//! Registry needs for operation.

use serde::{Deserialize, Serialize};
use shared_types::{CodeFormatError, CodeValue, StoreError, Timestamp};

use crate::domain::{RedeemResult, VerificationCode};

/// Persistence for verification codes.
///
/// Every state transition must be a single atomic check-and-set per code
/// value. Implementations never hold a lock across calls.
pub trait CodeStore: Send + Sync {
    /// Stores a new code.
    ///
    /// # Errors
    /// - `DuplicateCode`: a code with the same value is still held
    /// - `CapacityExceeded`: the store is full
    fn insert(&self, code: VerificationCode) -> Result<(), StoreError>;

    /// Returns a snapshot of the stored record. Callers derive status with
    /// [`VerificationCode::status`].
    fn get(&self, value: &CodeValue) -> Option<VerificationCode>;

    /// Single-step redemption: Pending → Redeemed.
    ///
    /// Under concurrent calls for one value exactly one returns `Ok`, the
    /// rest observe `AlreadyRedeemed`.
    fn mark_redeemed(&self, value: &CodeValue, now: Timestamp) -> RedeemResult<VerificationCode>;

    /// First phase of a two-phase redemption: Pending → Claimed.
    ///
    /// Same atomicity guarantee as `mark_redeemed`.
    fn claim(&self, value: &CodeValue, now: Timestamp) -> RedeemResult<VerificationCode>;

    /// Commits a claim: Claimed → Redeemed.
    fn confirm(&self, value: &CodeValue, now: Timestamp) -> RedeemResult<VerificationCode>;

    /// Rolls back a claim: Claimed → Pending.
    fn release(&self, value: &CodeValue) -> RedeemResult<()>;

    /// Idempotent maintenance pass. Evicts codes past their retention window
    /// and never changes the state of a code, so an in-flight claim stays
    /// held until its redeemer confirms or releases it.
    fn sweep_expired(&self, now: Timestamp) -> SweepReport;

    /// Number of stored codes in any state.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source of fresh code values.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> Result<CodeValue, CodeFormatError>;
}

/// Result of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Codes removed because their retention window passed.
    pub evicted: usize,
    /// Expired or redeemed codes still kept for audit.
    pub retained: usize,
    /// Codes held by an in-flight redemption. Never released by the sweep.
    pub claimed: usize,
}
