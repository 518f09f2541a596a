//! # Node Runtime Library
//!
//! Wiring and lifecycle of the entitlement authority. The binary in
//! `main.rs` is a thin shell over [`EntitlementNode`].
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging from `EA_*` variables
//! 2. Load and validate [`NodeConfig`]
//! 3. Wire subsystems into a [`ServiceContainer`]
//! 4. Spawn the maintenance sweeper and the HTTP gateway
//! 5. Wait for Ctrl-C, then signal shutdown over a `watch` channel

pub mod container;
pub mod node;

pub use container::{load_config, ConfigError, MaintenanceConfig, NodeConfig, ServiceContainer};
pub use node::EntitlementNode;
