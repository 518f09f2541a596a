//! Background maintenance.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::ports::EntitlementApi;

/// Background task that sweeps codes and expires subscriptions.
///
/// Runs until dropped; the caller stops it with `tokio::select!` against its
/// shutdown signal. Correctness never depends on this task running, since
/// expiry is also checked on every read.
pub async fn maintenance_task(api: Arc<dyn EntitlementApi>, interval: Duration) {
    let mut sweep_interval = tokio::time::interval(interval);
    sweep_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        sweep_interval.tick().await;
        match api.run_maintenance() {
            Ok(report) => {
                if report.codes.evicted > 0 || report.subscriptions_deactivated > 0 {
                    debug!(
                        codes_evicted = report.codes.evicted,
                        codes_retained = report.codes.retained,
                        codes_claimed = report.codes.claimed,
                        subscriptions_deactivated = report.subscriptions_deactivated,
                        "Maintenance pass complete"
                    );
                }
            }
            Err(err) => error!(error = %err, "Maintenance pass failed"),
        }
    }
}
