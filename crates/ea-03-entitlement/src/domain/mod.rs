//! Domain layer for the Entitlement subsystem.

pub mod snapshot;
pub mod subscription;

pub use snapshot::*;
pub use subscription::*;
