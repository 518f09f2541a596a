//! Domain layer for the Code Registry subsystem.

pub mod config;
pub mod entities;
pub mod errors;
pub mod issuer;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use issuer::*;
