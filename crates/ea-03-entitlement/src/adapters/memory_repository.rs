//! In-memory subscription repository.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{AccountId, CodeValue, StoreError, Timestamp};
use tracing::debug;

use crate::domain::SubscriptionRecord;
use crate::ports::{RecordUpdate, SubscriptionRepository};

#[derive(Debug, Default)]
struct RepositoryState {
    records: HashMap<AccountId, SubscriptionRecord>,
    /// Every code that ever activated a record. Codes are unique, so an
    /// entry is never reassigned to another account.
    by_code: HashMap<CodeValue, AccountId>,
}

/// [`SubscriptionRepository`] behind a single `RwLock`.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepository {
    state: RwLock<RepositoryState>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionRepository for InMemorySubscriptionRepository {
    fn get(&self, account_id: &AccountId) -> Result<Option<SubscriptionRecord>, StoreError> {
        Ok(self.state.read().records.get(account_id).cloned())
    }

    fn find_by_code(&self, code: &CodeValue) -> Result<Option<SubscriptionRecord>, StoreError> {
        let state = self.state.read();
        Ok(state
            .by_code
            .get(code)
            .and_then(|account| state.records.get(account))
            .cloned())
    }

    fn update(
        &self,
        account_id: &AccountId,
        update: RecordUpdate<'_>,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        let mut state = self.state.write();
        let Some(next) = update(state.records.get(account_id)) else {
            return Ok(None);
        };

        if let Some(code) = &next.activation_code {
            state.by_code.insert(code.clone(), account_id.clone());
        }
        state.records.insert(account_id.clone(), next.clone());
        Ok(Some(next))
    }

    fn deactivate_expired(&self, now: Timestamp) -> Result<Vec<AccountId>, StoreError> {
        let mut state = self.state.write();
        let mut deactivated = Vec::new();

        for record in state.records.values_mut() {
            if record.is_active && record.is_expired(now) {
                record.is_active = false;
                record.updated_at = now;
                deactivated.push(record.account_id.clone());
            }
        }

        if !deactivated.is_empty() {
            debug!(count = deactivated.len(), "Deactivated expired subscriptions");
        }
        Ok(deactivated)
    }

    fn len(&self) -> usize {
        self.state.read().records.len()
    }
}
