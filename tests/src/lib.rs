//! # RBAC Chain Test Suite
//!
//! Unified test crate driving the engine through its public API only: every
//! scenario builds real envelopes with declared read/write sets and runs
//! them through the full dispatch path against an in-memory ledger.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Envelope and payload fixtures
//! └── integration/      # Cross-crate scenarios
//!     ├── lifecycle.rs  # Create → propose → decide flows
//!     ├── determinism.rs
//!     └── manager_chain.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rbac-tests
//! cargo test -p rbac-tests integration::lifecycle
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod support;
