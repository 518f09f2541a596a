//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors raised by any persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with the same key already exists.
    #[error("Duplicate key: a record with this code already exists")]
    DuplicateCode,

    /// The store refuses new records until space is reclaimed.
    #[error("Store full: capacity of {capacity} records reached")]
    CapacityExceeded { capacity: usize },

    /// Backing storage could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Rejection reasons for user-supplied code strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeFormatError {
    #[error("Code is empty")]
    Empty,

    #[error("Code length {len} outside allowed range {min}..={max}")]
    Length { len: usize, min: usize, max: usize },

    #[error("Code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Rejection for an unknown subscription level name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown subscription level: {0}")]
pub struct UnknownLevel(pub String);
