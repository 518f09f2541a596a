//! # Entitlement Metrics
//!
//! Prometheus metrics for code redemption and subscription activity.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! ea-03-entitlement = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `entitlement_codes_issued_total` - Counter of issued codes (by purpose)
//! - `entitlement_redemptions_total` - Counter of redemption attempts (by flow, outcome)
//! - `entitlement_activations_total` - Counter of successful activations (by level)
//! - `entitlement_codes_evicted_total` - Counter of codes evicted by the sweep
//! - `entitlement_subscriptions_expired_total` - Counter of subscriptions deactivated by the sweep

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total codes issued, labeled by purpose
    pub static ref CODES_ISSUED: IntCounterVec = register_int_counter_vec!(
        "entitlement_codes_issued_total",
        "Total number of verification codes issued",
        &["purpose"]
    )
    .expect("Failed to create CODES_ISSUED metric");

    /// Redemption attempts, labeled by flow and outcome
    pub static ref REDEMPTIONS: IntCounterVec = register_int_counter_vec!(
        "entitlement_redemptions_total",
        "Total number of code redemption attempts",
        &["flow", "outcome"]
    )
    .expect("Failed to create REDEMPTIONS metric");

    /// Successful activations, labeled by resulting level
    pub static ref ACTIVATIONS: IntCounterVec = register_int_counter_vec!(
        "entitlement_activations_total",
        "Total number of successful subscription activations",
        &["level"]
    )
    .expect("Failed to create ACTIVATIONS metric");

    /// Codes evicted after their retention window
    pub static ref CODES_EVICTED: IntCounter = register_int_counter!(
        "entitlement_codes_evicted_total",
        "Total number of codes evicted by maintenance"
    )
    .expect("Failed to create CODES_EVICTED metric");

    /// Subscriptions deactivated on expiry
    pub static ref SUBSCRIPTIONS_EXPIRED: IntCounter = register_int_counter!(
        "entitlement_subscriptions_expired_total",
        "Total number of subscriptions deactivated by maintenance"
    )
    .expect("Failed to create SUBSCRIPTIONS_EXPIRED metric");
}

/// Record an issued code
#[cfg(feature = "metrics")]
pub fn record_code_issued(purpose: &str) {
    CODES_ISSUED.with_label_values(&[purpose]).inc();
}

/// Record a redemption attempt
#[cfg(feature = "metrics")]
pub fn record_redemption(flow: &str, outcome: &str) {
    REDEMPTIONS.with_label_values(&[flow, outcome]).inc();
}

/// Record a successful activation
#[cfg(feature = "metrics")]
pub fn record_activation(level: &str) {
    ACTIVATIONS.with_label_values(&[level]).inc();
}

/// Record a maintenance pass
#[cfg(feature = "metrics")]
pub fn record_maintenance(codes_evicted: usize, subscriptions_expired: usize) {
    CODES_EVICTED.inc_by(codes_evicted as u64);
    SUBSCRIPTIONS_EXPIRED.inc_by(subscriptions_expired as u64);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_code_issued(_purpose: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_redemption(_flow: &str, _outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_activation(_level: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_maintenance(_codes_evicted: usize, _subscriptions_expired: usize) {}
