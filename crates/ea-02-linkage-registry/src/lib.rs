//! # Linkage Registry Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Records which external identity (a chat account such as
//! `discordUser#1234`) belongs to which internal account.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One account per identity | `InMemoryLinkageRegistry::link()` identity index check |
//! | One identity per account | `InMemoryLinkageRegistry::link()` account index check |
//! | Links are immutable | No overwrite or removal operation exists |
//!
//! Both indices are checked and written under a single write lock, so two
//! racing `link` calls cannot both succeed for the same identity or account.
//!
//! ## Module Structure
//!
//! ```text
//! adapters/memory.rs  - InMemoryLinkageRegistry (RwLock over both indices)
//! ports/mod.rs        - LinkageRegistry trait
//! domain/entities.rs  - Linkage
//! domain/errors.rs    - LinkError
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
