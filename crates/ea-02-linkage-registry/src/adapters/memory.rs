//! In-memory linkage registry.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{AccountId, ExternalIdentity, Timestamp};
use tracing::{info, warn};

use crate::domain::{LinkError, LinkageResult, Linkage};
use crate::ports::LinkageRegistry;

#[derive(Debug, Default)]
struct LinkState {
    by_identity: HashMap<ExternalIdentity, Linkage>,
    by_account: HashMap<AccountId, ExternalIdentity>,
}

/// [`LinkageRegistry`] holding both directions under one lock.
#[derive(Debug, Default)]
pub struct InMemoryLinkageRegistry {
    state: RwLock<LinkState>,
}

impl InMemoryLinkageRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkageRegistry for InMemoryLinkageRegistry {
    fn link(
        &self,
        external_identity: &ExternalIdentity,
        account_id: &AccountId,
        now: Timestamp,
    ) -> LinkageResult<Linkage> {
        let mut state = self.state.write();

        if let Some(existing) = state.by_identity.get(external_identity) {
            warn!(
                identity = %external_identity,
                existing_account = %existing.account_id,
                "Identity already linked"
            );
            return Err(LinkError::AlreadyLinked {
                existing_account: existing.account_id.clone(),
            });
        }

        if let Some(existing) = state.by_account.get(account_id) {
            warn!(
                account_id = %account_id,
                existing_identity = %existing,
                "Account already linked"
            );
            return Err(LinkError::AccountAlreadyLinked {
                existing_identity: existing.clone(),
            });
        }

        let linkage = Linkage::new(external_identity.clone(), account_id.clone(), now);
        state
            .by_identity
            .insert(external_identity.clone(), linkage.clone());
        state
            .by_account
            .insert(account_id.clone(), external_identity.clone());

        info!(identity = %external_identity, account_id = %account_id, "Identity linked");
        Ok(linkage)
    }

    fn resolve(&self, external_identity: &ExternalIdentity) -> Option<AccountId> {
        self.state
            .read()
            .by_identity
            .get(external_identity)
            .map(|l| l.account_id.clone())
    }

    fn identity_for(&self, account_id: &AccountId) -> Option<ExternalIdentity> {
        self.state.read().by_account.get(account_id).cloned()
    }

    fn get(&self, external_identity: &ExternalIdentity) -> Option<Linkage> {
        self.state.read().by_identity.get(external_identity).cloned()
    }

    fn len(&self) -> usize {
        self.state.read().by_identity.len()
    }
}
