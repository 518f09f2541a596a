//! Adapters layer for the Code Registry subsystem.

pub mod generator;
pub mod memory_store;

pub use generator::*;
pub use memory_store::*;
