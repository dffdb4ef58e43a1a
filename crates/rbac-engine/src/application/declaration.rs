//! Declared read/write set computation.
//!
//! Clients must declare, per envelope, every address the engine will touch
//! so the platform can schedule non-overlapping transactions in parallel.
//! This module derives those sets from a tag and its encoded payload; the
//! handlers then verify their actual accesses stay inside what was
//! declared.

use crate::application::handlers::decode_content;
use crate::domain::errors::EngineError;
use crate::domain::relationships::RelationshipSpec;
use rbac_addressing::{proposal_address, user_attributes_address, Address};
use rbac_types::{
    CreateRolePayload, CreateTaskPayload, CreateUserPayload, DecidePayload, MessageType,
    ProposalKind, ProposePayload,
};
use std::collections::BTreeSet;

fn grouping_sets(
    attributes: Address,
    owner_addr: Address,
    admin_addr: Address,
    owners: &[String],
    admins: &[String],
) -> (Vec<Address>, Vec<Address>) {
    let mut inputs: BTreeSet<Address> =
        [attributes.clone(), owner_addr.clone(), admin_addr.clone()].into();
    inputs.extend(owners.iter().chain(admins).map(|u| user_attributes_address(u)));
    let outputs = vec![attributes, owner_addr, admin_addr];
    (inputs.into_iter().collect(), outputs)
}

/// Compute the input and output address sets an envelope with this tag and
/// content must declare.
///
/// Addresses read during manager-chain walks are not included; the chain is
/// data-dependent and the walk reads them through the gateway without a
/// declaration check.
pub fn declared_sets(
    message_type: MessageType,
    content: &[u8],
) -> Result<(Vec<Address>, Vec<Address>), EngineError> {
    match message_type {
        MessageType::CreateUser => {
            let payload: CreateUserPayload = decode_content(content)?;
            let address = user_attributes_address(&payload.user_id);
            Ok((vec![address.clone()], vec![address]))
        }
        MessageType::CreateRole => {
            let payload: CreateRolePayload = decode_content(content)?;
            Ok(grouping_sets(
                rbac_addressing::role_attributes_address(&payload.role_id),
                rbac_addressing::role_owners_address(&payload.role_id),
                rbac_addressing::role_admins_address(&payload.role_id),
                &payload.owners,
                &payload.admins,
            ))
        }
        MessageType::CreateTask => {
            let payload: CreateTaskPayload = decode_content(content)?;
            Ok(grouping_sets(
                rbac_addressing::task_attributes_address(&payload.task_id),
                rbac_addressing::task_owners_address(&payload.task_id),
                rbac_addressing::task_admins_address(&payload.task_id),
                &payload.owners,
                &payload.admins,
            ))
        }
        MessageType::Propose(ProposalKind::Membership { relationship, .. }) => {
            let payload: ProposePayload = decode_content(content)?;
            let spec = RelationshipSpec::of(relationship);
            let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
            let inputs: BTreeSet<Address> = [
                spec.object_attributes_address(&payload.object_id),
                spec.related_attributes_address(&payload.related_id),
                spec.container_address(&payload.object_id),
                spec.owner_address(&payload.object_id),
                spec.admin_address(&payload.object_id),
                prop_addr.clone(),
            ]
            .into();
            Ok((inputs.into_iter().collect(), vec![prop_addr]))
        }
        MessageType::Propose(ProposalKind::UpdateUserManager) => {
            let payload: ProposePayload = decode_content(content)?;
            let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
            let inputs: BTreeSet<Address> = [
                user_attributes_address(&payload.object_id),
                user_attributes_address(&payload.related_id),
                prop_addr.clone(),
            ]
            .into();
            Ok((inputs.into_iter().collect(), vec![prop_addr]))
        }
        MessageType::Confirm(ProposalKind::Membership { relationship, .. }) => {
            let payload: DecidePayload = decode_content(content)?;
            let spec = RelationshipSpec::of(relationship);
            let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
            let container_addr = spec.container_address(&payload.object_id);
            let inputs: BTreeSet<Address> = [
                prop_addr.clone(),
                container_addr.clone(),
                spec.approver_address(&payload.object_id),
            ]
            .into();
            Ok((inputs.into_iter().collect(), vec![prop_addr, container_addr]))
        }
        MessageType::Reject(ProposalKind::Membership { relationship, .. }) => {
            let payload: DecidePayload = decode_content(content)?;
            let spec = RelationshipSpec::of(relationship);
            let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
            let inputs: BTreeSet<Address> =
                [prop_addr.clone(), spec.approver_address(&payload.object_id)].into();
            Ok((inputs.into_iter().collect(), vec![prop_addr]))
        }
        MessageType::Confirm(ProposalKind::UpdateUserManager) => {
            let payload: DecidePayload = decode_content(content)?;
            let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
            let subject_attr = user_attributes_address(&payload.object_id);
            let inputs: BTreeSet<Address> = [prop_addr.clone(), subject_attr.clone()].into();
            Ok((inputs.into_iter().collect(), vec![prop_addr, subject_attr]))
        }
        MessageType::Reject(ProposalKind::UpdateUserManager) => {
            let payload: DecidePayload = decode_content(content)?;
            let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
            Ok((vec![prop_addr.clone()], vec![prop_addr]))
        }
    }
}
