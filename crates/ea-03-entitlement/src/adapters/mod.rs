//! Adapters layer for the Entitlement subsystem.

pub mod memory_repository;

pub use memory_repository::*;
