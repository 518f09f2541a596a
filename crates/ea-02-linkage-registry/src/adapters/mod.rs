//! Adapters layer for the Linkage Registry subsystem.

pub mod memory;

pub use memory::*;
