//! Domain layer for the Linkage Registry subsystem.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
