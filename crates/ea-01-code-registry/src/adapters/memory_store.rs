//! In-memory code store.
//!
//! Backed by a sharded `DashMap`. Each transition takes the shard write lock
//! for one key via `get_mut`, so check and set happen under the same guard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{CodeValue, StoreError, Timestamp};
use tracing::{debug, warn};

use crate::domain::{CodeRegistryConfig, CodeState, RedeemError, RedeemResult, VerificationCode};
use crate::ports::{CodeStore, SweepReport};

/// Counters for the in-memory store.
#[derive(Debug, Default)]
pub struct CodeStoreStats {
    pub total_inserted: AtomicU64,
    pub total_redeemed: AtomicU64,
    pub total_rejected: AtomicU64,
    pub total_evicted: AtomicU64,
}

/// DashMap-backed [`CodeStore`].
pub struct InMemoryCodeStore {
    codes: DashMap<CodeValue, VerificationCode>,
    capacity: usize,
    retention_ms: u64,
    stats: Arc<CodeStoreStats>,
}

impl InMemoryCodeStore {
    pub fn new(config: &CodeRegistryConfig) -> Self {
        Self {
            codes: DashMap::new(),
            capacity: config.max_codes,
            retention_ms: config.retention_ms,
            stats: Arc::new(CodeStoreStats::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> &CodeStoreStats {
        &self.stats
    }

    fn record_rejection(&self, value: &CodeValue, err: &RedeemError) {
        self.stats.total_rejected.fetch_add(1, Ordering::Relaxed);
        debug!(code = %value.redacted(), reason = %err, "Redemption rejected");
    }

    /// Runs a Pending → `next` transition under the key's shard lock.
    fn transition_from_pending(
        &self,
        value: &CodeValue,
        now: Timestamp,
        next: CodeState,
    ) -> RedeemResult<VerificationCode> {
        let result = match self.codes.get_mut(value) {
            None => Err(RedeemError::NotFound),
            Some(mut entry) => entry.check_redeemable(now).map(|()| {
                entry.state = next;
                entry.value().clone()
            }),
        };
        if let Err(err) = &result {
            self.record_rejection(value, err);
        }
        result
    }
}

impl Default for InMemoryCodeStore {
    fn default() -> Self {
        Self::new(&CodeRegistryConfig::default())
    }
}

impl CodeStore for InMemoryCodeStore {
    fn insert(&self, code: VerificationCode) -> Result<(), StoreError> {
        // Soft limit: concurrent inserts may overshoot by the number of racing writers.
        if self.codes.len() >= self.capacity {
            warn!(capacity = self.capacity, "Code store at capacity");
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        match self.codes.entry(code.value.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateCode),
            Entry::Vacant(slot) => {
                slot.insert(code);
                self.stats.total_inserted.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }
    }

    fn get(&self, value: &CodeValue) -> Option<VerificationCode> {
        self.codes.get(value).map(|entry| entry.value().clone())
    }

    fn mark_redeemed(&self, value: &CodeValue, now: Timestamp) -> RedeemResult<VerificationCode> {
        let redeemed =
            self.transition_from_pending(value, now, CodeState::Redeemed { redeemed_at: now })?;
        self.stats.total_redeemed.fetch_add(1, Ordering::Relaxed);
        debug!(code = %value.redacted(), "Code redeemed");
        Ok(redeemed)
    }

    fn claim(&self, value: &CodeValue, now: Timestamp) -> RedeemResult<VerificationCode> {
        let claimed =
            self.transition_from_pending(value, now, CodeState::Claimed { claimed_at: now })?;
        debug!(code = %value.redacted(), "Code claimed");
        Ok(claimed)
    }

    fn confirm(&self, value: &CodeValue, now: Timestamp) -> RedeemResult<VerificationCode> {
        let mut entry = self.codes.get_mut(value).ok_or(RedeemError::NotFound)?;
        if !entry.is_claimed() {
            return Err(RedeemError::NotClaimed);
        }
        entry.state = CodeState::Redeemed { redeemed_at: now };
        self.stats.total_redeemed.fetch_add(1, Ordering::Relaxed);
        debug!(code = %value.redacted(), "Claim confirmed");
        Ok(entry.value().clone())
    }

    fn release(&self, value: &CodeValue) -> RedeemResult<()> {
        let mut entry = self.codes.get_mut(value).ok_or(RedeemError::NotFound)?;
        if !entry.is_claimed() {
            return Err(RedeemError::NotClaimed);
        }
        entry.state = CodeState::Pending;
        debug!(code = %value.redacted(), "Claim released");
        Ok(())
    }

    fn sweep_expired(&self, now: Timestamp) -> SweepReport {
        let mut report = SweepReport::default();

        self.codes.retain(|_, code| {
            // A claim belongs to a redemption that is still running.
            if code.is_claimed() {
                report.claimed += 1;
                return true;
            }

            let finished = code.is_expired(now) || code.redeemed_at().is_some();
            if !finished {
                return true;
            }

            let evict_after = code.retention_anchor().saturating_add(self.retention_ms);
            if now > evict_after {
                report.evicted += 1;
                false
            } else {
                report.retained += 1;
                true
            }
        });

        self.stats
            .total_evicted
            .fetch_add(report.evicted as u64, Ordering::Relaxed);
        if report.evicted > 0 {
            debug!(
                evicted = report.evicted,
                retained = report.retained,
                claimed = report.claimed,
                "Code sweep complete"
            );
        }
        report
    }

    fn len(&self) -> usize {
        self.codes.len()
    }
}
