//! Invariants of the propose/confirm/reject workflow.
//!
//! Pure checks over pre-fetched entries; the manager-hierarchy walk, which
//! needs the gateway, lives in the application layer.

use crate::domain::entity_rules::decode_entry;
use crate::domain::errors::EngineError;
use crate::domain::Entries;
use rbac_addressing::Address;
use rbac_types::{Proposal, ProposalContainer, ProposalKind};

/// True when no OPEN proposal exists for this exact (object, target, kind)
/// tuple. Absence of the container counts as "no open proposal".
pub fn has_no_open_proposal(
    entries: &Entries,
    proposal_address: &Address,
    object_id: &str,
    related_id: &str,
    kind: ProposalKind,
) -> Result<bool, EngineError> {
    let container: Option<ProposalContainer> = decode_entry(entries, proposal_address)?;
    Ok(match container {
        Some(c) => c.open_for(object_id, related_id, kind).is_none(),
        None => true,
    })
}

/// True when a proposal with this id exists in the container and is OPEN.
pub fn proposal_exists_and_open(
    entries: &Entries,
    proposal_address: &Address,
    proposal_id: &str,
) -> Result<bool, EngineError> {
    let container: Option<ProposalContainer> = decode_entry(entries, proposal_address)?;
    Ok(container
        .and_then(|c| c.by_id(proposal_id).map(Proposal::is_open))
        .unwrap_or(false))
}
