//! # Shared Types Crate
//!
//! Primitives used across the entitlement subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Identifiers, code values, levels and plans are
//!   defined once here and reused by every subsystem.
//! - **Injected Time**: No subsystem reads the wall clock directly. All "now"
//!   values come from a [`TimeSource`], so expiry is testable.
//! - **Validated Newtypes**: A [`CodeValue`] can only be constructed through
//!   normalization, so every lookup key has the same canonical form.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::*;
