//! Outbound ports for the Entitlement subsystem.

use shared_types::{AccountId, CodeValue, StoreError, Timestamp};

use crate::domain::SubscriptionRecord;

/// Applied to the current record under the repository's write lock.
/// Returning `None` leaves the record untouched.
pub type RecordUpdate<'a> =
    &'a dyn Fn(Option<&SubscriptionRecord>) -> Option<SubscriptionRecord>;

/// Persistence of subscription records.
pub trait SubscriptionRepository: Send + Sync {
    fn get(&self, account_id: &AccountId) -> Result<Option<SubscriptionRecord>, StoreError>;

    /// Record activated (at any time) by `code`.
    fn find_by_code(&self, code: &CodeValue) -> Result<Option<SubscriptionRecord>, StoreError>;

    /// Atomic read-modify-write of one account's record.
    ///
    /// Indexes the new record's `activation_code`. Returns the stored record,
    /// or `None` when `update` declined to write.
    fn update(
        &self,
        account_id: &AccountId,
        update: RecordUpdate<'_>,
    ) -> Result<Option<SubscriptionRecord>, StoreError>;

    /// Flips `is_active` off for records past their expiration.
    /// Returns the affected accounts.
    fn deactivate_expired(&self, now: Timestamp) -> Result<Vec<AccountId>, StoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
