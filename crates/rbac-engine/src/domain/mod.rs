//! Pure domain rules: no I/O, no shared state.

pub mod entity_rules;
pub mod errors;
pub mod proposal_rules;
pub mod relationships;

use rbac_addressing::Address;
use std::collections::BTreeMap;

/// Pre-fetched ledger entries, keyed by address. Handlers receive exactly
/// the entries they declared they would read.
pub type Entries = BTreeMap<Address, Vec<u8>>;
