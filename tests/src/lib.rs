//! # Namespace Module Bus Test Suite
//!
//! End-to-end tests that drive a running daemon through bus connections,
//! plus codec benchmarks.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── codec_benchmarks.rs  # Boxed validation and native encoding
//! └── src/integration/
//!     ├── flows.rs             # Native and boxed calls, imports, faults
//!     ├── authorization.rs     # Denial, broker grant, retry
//!     └── introspection.rs     # XML served at the root and per module
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p nsb-tests
//!
//! # By area
//! cargo test -p nsb-tests integration::flows::
//! cargo test -p nsb-tests integration::authorization::
//!
//! # Benchmarks
//! cargo bench -p nsb-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
