//! # Entitlement Authority Test Suite
//!
//! Unified test crate for behavior that spans subsystems.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── flows.rs        # activation and linking walkthroughs
//! │   ├── concurrency.rs  # at-most-once redemption, linking races
//! │   └── http.rs         # gateway over a wired container
//! └── benches/            # criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ea-tests
//!
//! # By category
//! cargo test -p ea-tests integration::concurrency::
//!
//! # Benchmarks
//! cargo bench -p ea-tests
//! ```

pub mod integration;
