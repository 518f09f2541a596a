//! # Code Registry Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Issues short-lived verification codes and stores them with an atomic,
//! at-most-once redemption protocol. Codes either link an external identity
//! to an account or activate a subscription plan.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Unique code values among stored codes | `InMemoryCodeStore::insert()` vacant-entry check |
//! | `expires_at > issued_at` | `VerificationCode::new()` clamps TTL to at least 1ms |
//! | Pending → Redeemed exactly once | `InMemoryCodeStore::claim()` / `mark_redeemed()` under the shard lock |
//! | Past `expires_at` is Expired regardless of state | `VerificationCode::status()` (derived, never written) |
//!
//! ## Two-Phase Redemption
//!
//! Consumers that must apply a side effect (subscription update, identity
//! link) claim the code first and only confirm once the side effect
//! committed. A failed side effect releases the claim.
//!
//! ```text
//! [PENDING] ──claim──→ [CLAIMED] ──confirm──→ [REDEEMED]
//!     │                    │
//!     │                    └── release ──→ [PENDING]
//!     └── now > expires_at ──→ (EXPIRED, derived)
//! ```
//!
//! | Stage | Method | Effect |
//! |-------|--------|--------|
//! | Claim | `store.claim()` | Move to CLAIMED; concurrent claimers see `AlreadyRedeemed` |
//! | Confirm | `store.confirm()` | Move to REDEEMED (terminal) |
//! | Release | `store.release()` | Return to PENDING |
//! | Sweep | `store.sweep_expired()` | Evict past retention; claims are left alone |
//!
//! Single-step callers use `store.mark_redeemed()`, which performs the same
//! check-and-set in one call.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/memory_store.rs - DashMap-backed CodeStore            │
//! │  adapters/generator.rs    - OS CSPRNG / scripted generators     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - CodeIssuanceApi trait                      │
//! │  ports/outbound.rs - CodeStore, CodeGenerator traits            │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs - VerificationCode, CodeState, CodeStatus   │
//! │  domain/issuer.rs   - CodeIssuer with collision retry           │
//! │  domain/config.rs   - CodeRegistryConfig                        │
//! │  domain/errors.rs   - RedeemError, IssuanceError                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
