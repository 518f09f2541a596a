//! Ports for the Linkage Registry subsystem.

use shared_types::{AccountId, ExternalIdentity, Timestamp};

use crate::domain::{LinkageResult, Linkage};

/// Persistence of identity ↔ account bindings.
pub trait LinkageRegistry: Send + Sync {
    /// Creates a binding.
    ///
    /// # Errors
    /// - `AlreadyLinked`: the identity already has a binding, even to `account_id`
    /// - `AccountAlreadyLinked`: the account is bound to another identity
    fn link(
        &self,
        external_identity: &ExternalIdentity,
        account_id: &AccountId,
        now: Timestamp,
    ) -> LinkageResult<Linkage>;

    /// Account bound to `external_identity`, if any.
    fn resolve(&self, external_identity: &ExternalIdentity) -> Option<AccountId>;

    /// Identity bound to `account_id`, if any.
    fn identity_for(&self, account_id: &AccountId) -> Option<ExternalIdentity>;

    /// Full binding record for `external_identity`.
    fn get(&self, external_identity: &ExternalIdentity) -> Option<Linkage>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
