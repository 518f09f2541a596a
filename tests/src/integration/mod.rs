//! Cross-subsystem integration tests.

pub mod concurrency;
pub mod flows;
pub mod http;
