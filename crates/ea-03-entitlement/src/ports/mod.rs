//! Ports layer for the Entitlement subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
