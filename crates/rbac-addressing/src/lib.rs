//! # RBAC Addressing
//!
//! Deterministic mapping between logical RBAC entities and fixed-length
//! hexadecimal addresses in the ledger's flat namespace.
//!
//! ## Layout
//!
//! Every address is 70 lowercase hex characters:
//!
//! ```text
//! namespace prefix (6) || bucket selector (2) || hash suffix (62)
//! ```
//!
//! The namespace prefix is constant for this application family. The bucket
//! selector places each entity kind and relationship kind into a disjoint
//! numeric sub-range, so the member, owner, and admin containers of the same
//! parent land at different, predictable addresses without a lookup index.
//! The suffix carries the remaining bits of a SHA-512 digest of the
//! identifier, which makes collisions between distinct identifiers
//! vanishingly unlikely.
//!
//! All functions here are pure: the same identifier always yields the same
//! address, on every node and across process restarts.

pub mod address;
pub mod codec;

pub use address::{Address, AddressError, ADDRESS_LENGTH, PREFIX_LENGTH};
pub use codec::{
    classify, family_prefix, proposal_address, role_admins_address, role_attributes_address,
    role_members_address, role_owners_address, role_tasks_address, task_admins_address,
    task_attributes_address, task_owners_address, user_attributes_address, AddressKind,
};
