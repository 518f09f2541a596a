//! Ports layer for the Code Registry subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
