//! # RBAC Shared Types
//!
//! Domain entities, ledger containers, the wire envelope, and per-message
//! payload structs shared by the transaction engine and its hosts.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every cross-crate type lives here.
//! - **Deterministic bytes**: all ledger-resident types serialize through
//!   bincode with ordered maps, so identical state produces identical bytes
//!   on every replica.
//! - **Explicit payloads**: each message kind has a struct with named
//!   fields; nothing is looked up by attribute name at runtime.

pub mod codec;
pub mod containers;
pub mod entities;
pub mod envelope;
pub mod payloads;

pub use codec::{from_bytes, to_bytes, CodecError};
pub use containers::*;
pub use entities::*;
pub use envelope::{MessageType, TransactionEnvelope};
pub use payloads::*;
