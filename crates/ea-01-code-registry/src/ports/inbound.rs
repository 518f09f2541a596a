//! Inbound (Driving) ports for the Code Registry subsystem.

use crate::domain::{IssuanceResult, IssueRequest, VerificationCode};

/// Primary API for issuing codes.
pub trait CodeIssuanceApi: Send + Sync {
    /// Generates, stores and returns a new Pending code.
    fn issue(&self, request: IssueRequest) -> IssuanceResult<VerificationCode>;
}
