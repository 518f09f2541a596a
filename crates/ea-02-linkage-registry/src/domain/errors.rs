//! Error types for the Linkage Registry subsystem.

use shared_types::{AccountId, ExternalIdentity, StoreError};
use thiserror::Error;

/// Reasons a link was not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The identity is already bound (to this or another account).
    #[error("External identity already linked to account {existing_account}")]
    AlreadyLinked { existing_account: AccountId },

    /// The account is already bound to a different identity.
    #[error("Account already linked to external identity {existing_identity}")]
    AccountAlreadyLinked { existing_identity: ExternalIdentity },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl LinkError {
    /// True for the two one-to-one conflicts, false for storage failures.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyLinked { .. } | Self::AccountAlreadyLinked { .. }
        )
    }
}

pub type LinkageResult<T> = Result<T, LinkError>;
