//! # Entitlement Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Redeems verification codes and answers entitlement queries. Activation
//! codes create or extend subscription records; linking codes bind a chat
//! identity to the issuing account.
//!
//! ## Redemption Protocol
//!
//! ```text
//! activate(code)
//!   ├─ parse         → InvalidCode
//!   ├─ lookup        → CodeNotFound
//!   ├─ expiry        → CodeExpired
//!   ├─ prior use     → CodeAlreadyRedeemed
//!   ├─ purpose       → WrongPurpose
//!   ├─ claim (atomic, repeats the three checks above)
//!   ├─ write subscription ──fail──→ release claim → Storage
//!   └─ confirm claim → ActivationResult
//! ```
//!
//! `redeem_for_linking` follows the same path with a linkage write in place
//! of the subscription write. Link conflicts release the claim and are
//! returned as `LinkResult` variants, not errors.
//!
//! ## Status Queries
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Code activated a record, record active | `is_active: true`, level, expiration |
//! | Record revoked | `is_active: false`, `Revoked` |
//! | Record past expiration (swept or not) | `is_active: false`, `Expired` |
//! | Code known, never activated, still valid | `is_active: false`, `NotActivated` |
//! | Code known, never activated, past expiry | `is_active: false`, `Expired` |
//! | Code unknown | `Err(CodeNotFound)` |
//!
//! ## Subscription Periods
//!
//! A fresh period starts at the code's issue time (or at redemption, per
//! [`PeriodAnchor`]). Redeeming while active stacks the plan's duration on the
//! current expiration and keeps the higher level.
//!
//! ## Outbound Dependencies
//!
//! | Subsystem | Trait | Purpose |
//! |-----------|-------|---------|
//! | 1 (Code Registry) | `CodeStore`, `CodeIssuanceApi` | Code lifecycle |
//! | 2 (Linkage Registry) | `LinkageRegistry` | Identity binding |
//! | - | `SubscriptionRepository` | Subscription persistence |
//! | - | `TimeSource` | Current time |

pub mod adapters;
pub mod domain;
pub mod error;
pub mod maintenance;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use error::*;
pub use maintenance::maintenance_task;
pub use ports::*;
pub use service::{EntitlementConfig, EntitlementService, PeriodAnchor};
