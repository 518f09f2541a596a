//! Linkage entity.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, ExternalIdentity, Timestamp};

/// An established identity ↔ account binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Linkage {
    pub external_identity: ExternalIdentity,
    pub account_id: AccountId,
    pub linked_at: Timestamp,
}

impl Linkage {
    pub fn new(external_identity: ExternalIdentity, account_id: AccountId, linked_at: Timestamp) -> Self {
        Self {
            external_identity,
            account_id,
            linked_at,
        }
    }
}
