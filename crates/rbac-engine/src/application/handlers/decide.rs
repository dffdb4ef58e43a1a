//! Confirm and reject handlers: resolve an OPEN proposal to its terminal
//! status, applying the relationship change on confirm.

use crate::application::handlers::{decode_content, require_field, HandlerContext, MessageHandler};
use crate::application::hierarchy::is_hierarchical_manager_of;
use crate::domain::entity_rules::decode_or_default;
use crate::domain::errors::EngineError;
use crate::domain::relationships::RelationshipSpec;
use crate::domain::Entries;
use async_trait::async_trait;
use rbac_addressing::{proposal_address, user_attributes_address, Address};
use rbac_types::{
    to_bytes, Action, DecidePayload, Proposal, ProposalContainer, ProposalKind, ProposalStatus,
    RelationshipContainer, RelationshipKind, UserContainer,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Pull the matching OPEN proposal out of its container, checking identity
/// and kind. Wrong ids, terminal status, or a kind/target mismatch are all
/// validation failures.
fn take_open_proposal<'a>(
    container: &'a mut ProposalContainer,
    payload: &DecidePayload,
    expected_kind: ProposalKind,
) -> Result<&'a mut Proposal, EngineError> {
    let Some(proposal) = container.by_id_mut(&payload.proposal_id) else {
        return Err(EngineError::ProposalNotOpen {
            proposal_id: payload.proposal_id.clone(),
        });
    };
    if !proposal.is_open() {
        return Err(EngineError::ProposalNotOpen {
            proposal_id: payload.proposal_id.clone(),
        });
    }
    if proposal.kind != expected_kind
        || proposal.object_id != payload.object_id
        || proposal.related_id != payload.related_id
    {
        return Err(EngineError::ProposalMismatch {
            proposal_id: payload.proposal_id.clone(),
        });
    }
    Ok(proposal)
}

/// Signer is an approver, or a hierarchical manager of one of the
/// approvers deciding on their behalf.
async fn authorize_decision(
    ctx: &HandlerContext<'_>,
    approvers: &RelationshipContainer,
    object_id: &str,
) -> Result<bool, EngineError> {
    if approvers.contains(object_id, ctx.signer) {
        return Ok(true);
    }
    let Some(relationship) = approvers
        .relationships
        .iter()
        .find(|r| r.object_id == object_id)
    else {
        return Ok(false);
    };
    for approver in &relationship.identifiers {
        if is_hierarchical_manager_of(ctx.gateway, ctx.config.max_manager_hops, ctx.signer, approver)
            .await?
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Confirms a membership proposal: applies the add/remove and closes the
/// proposal as CONFIRMED in one batch.
pub struct ConfirmMembershipHandler {
    spec: RelationshipSpec,
    action: Action,
}

impl ConfirmMembershipHandler {
    pub fn new(relationship: RelationshipKind, action: Action) -> Self {
        Self {
            spec: RelationshipSpec::of(relationship),
            action,
        }
    }
}

#[async_trait]
impl MessageHandler for ConfirmMembershipHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: DecidePayload = decode_content(content)?;
        require_field(&payload.proposal_id, "proposal_id")?;
        require_field(&payload.object_id, "object_id")?;
        require_field(&payload.related_id, "related_id")?;

        let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
        let container_addr = self.spec.container_address(&payload.object_id);
        let approver_addr = self.spec.approver_address(&payload.object_id);

        let reads: BTreeSet<Address> =
            [prop_addr.clone(), container_addr.clone(), approver_addr.clone()].into();
        ctx.require_inputs(&reads)?;
        ctx.require_outputs([&prop_addr, &container_addr])?;

        let reads: Vec<Address> = reads.into_iter().collect();
        let entries = ctx.gateway.fetch(&reads).await?;

        let mut proposals: ProposalContainer = decode_or_default(&entries, &prop_addr)?;
        let expected = ProposalKind::membership(self.spec.kind, self.action);
        take_open_proposal(&mut proposals, &payload, expected)?;

        let approvers: RelationshipContainer = decode_or_default(&entries, &approver_addr)?;
        if !authorize_decision(ctx, &approvers, &payload.object_id).await? {
            return Err(EngineError::Unauthorized {
                signer: ctx.signer.to_owned(),
                reason: format!("cannot decide proposals on {}", payload.object_id),
            });
        }

        // Apply the relationship change. The polarity held at propose time;
        // re-checking here catches state that moved since.
        let mut relationships: RelationshipContainer =
            decode_or_default(&entries, &container_addr)?;
        let applied = match self.action {
            Action::Add => relationships.insert(&payload.object_id, &payload.related_id),
            Action::Remove => relationships.remove(&payload.object_id, &payload.related_id),
        };
        if !applied {
            return Err(match self.action {
                Action::Add => EngineError::AlreadyRelated {
                    object_id: payload.object_id,
                    identifier: payload.related_id,
                },
                Action::Remove => EngineError::NotRelated {
                    object_id: payload.object_id,
                    identifier: payload.related_id,
                },
            });
        }

        // Borrow again after the relationship mutation to close the record.
        let proposal = take_open_proposal(&mut proposals, &payload, expected)?;
        proposal.close(ProposalStatus::Confirmed, &payload.reason);
        debug!(proposal_id = %payload.proposal_id, "proposal confirmed");

        let mut batch = Entries::new();
        batch.insert(prop_addr.clone(), to_bytes(&proposals)?);
        batch.insert(container_addr.clone(), to_bytes(&relationships)?);
        ctx.gateway.write(batch).await?;
        Ok(vec![prop_addr, container_addr])
    }
}

/// Rejects a membership proposal: closes it as REJECTED, relationship
/// untouched.
///
/// The parent entity is deliberately not required to still exist, so open
/// proposals can be swept after their subject is deleted; the opener may
/// also withdraw their own proposal.
pub struct RejectMembershipHandler {
    spec: RelationshipSpec,
    action: Action,
}

impl RejectMembershipHandler {
    pub fn new(relationship: RelationshipKind, action: Action) -> Self {
        Self {
            spec: RelationshipSpec::of(relationship),
            action,
        }
    }
}

#[async_trait]
impl MessageHandler for RejectMembershipHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: DecidePayload = decode_content(content)?;
        require_field(&payload.proposal_id, "proposal_id")?;
        require_field(&payload.object_id, "object_id")?;
        require_field(&payload.related_id, "related_id")?;

        let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
        let approver_addr = self.spec.approver_address(&payload.object_id);

        let reads: BTreeSet<Address> = [prop_addr.clone(), approver_addr.clone()].into();
        ctx.require_inputs(&reads)?;
        ctx.require_outputs([&prop_addr])?;

        let reads: Vec<Address> = reads.into_iter().collect();
        let entries = ctx.gateway.fetch(&reads).await?;

        let mut proposals: ProposalContainer = decode_or_default(&entries, &prop_addr)?;
        let expected = ProposalKind::membership(self.spec.kind, self.action);
        let opener = take_open_proposal(&mut proposals, &payload, expected)?
            .opener
            .clone();

        let authorized = if ctx.signer == opener {
            true
        } else {
            let approvers: RelationshipContainer = decode_or_default(&entries, &approver_addr)?;
            authorize_decision(ctx, &approvers, &payload.object_id).await?
        };
        if !authorized {
            return Err(EngineError::Unauthorized {
                signer: ctx.signer.to_owned(),
                reason: format!("cannot decide proposals on {}", payload.object_id),
            });
        }

        let proposal = take_open_proposal(&mut proposals, &payload, expected)?;
        proposal.close(ProposalStatus::Rejected, &payload.reason);
        debug!(proposal_id = %payload.proposal_id, "proposal rejected");

        let mut batch = Entries::new();
        batch.insert(prop_addr.clone(), to_bytes(&proposals)?);
        ctx.gateway.write(batch).await?;
        Ok(vec![prop_addr])
    }
}

/// Confirms a manager-change proposal: rewrites the user's `manager_id`
/// and closes the proposal in one batch.
///
/// Only the proposed new manager, or their hierarchical manager, may
/// confirm.
pub struct ConfirmManagerChangeHandler;

#[async_trait]
impl MessageHandler for ConfirmManagerChangeHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: DecidePayload = decode_content(content)?;
        require_field(&payload.proposal_id, "proposal_id")?;
        require_field(&payload.object_id, "object_id")?;
        require_field(&payload.related_id, "related_id")?;

        let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
        let subject_attr = user_attributes_address(&payload.object_id);

        let reads: BTreeSet<Address> = [prop_addr.clone(), subject_attr.clone()].into();
        ctx.require_inputs(&reads)?;
        ctx.require_outputs([&prop_addr, &subject_attr])?;

        let reads: Vec<Address> = reads.into_iter().collect();
        let entries = ctx.gateway.fetch(&reads).await?;

        let mut proposals: ProposalContainer = decode_or_default(&entries, &prop_addr)?;
        take_open_proposal(&mut proposals, &payload, ProposalKind::UpdateUserManager)?;

        let authorized = ctx.signer == payload.related_id
            || is_hierarchical_manager_of(
                ctx.gateway,
                ctx.config.max_manager_hops,
                ctx.signer,
                &payload.related_id,
            )
            .await?;
        if !authorized {
            return Err(EngineError::Unauthorized {
                signer: ctx.signer.to_owned(),
                reason: "only the proposed manager may confirm".into(),
            });
        }

        let mut users: UserContainer = decode_or_default(&entries, &subject_attr)?;
        let Some(user) = users.get_mut(&payload.object_id) else {
            return Err(EngineError::NotAUser {
                id: payload.object_id,
            });
        };
        user.manager_id = Some(payload.related_id.clone());

        let proposal = take_open_proposal(&mut proposals, &payload, ProposalKind::UpdateUserManager)?;
        proposal.close(ProposalStatus::Confirmed, &payload.reason);
        debug!(proposal_id = %payload.proposal_id, "manager change confirmed");

        let mut batch = Entries::new();
        batch.insert(prop_addr.clone(), to_bytes(&proposals)?);
        batch.insert(subject_attr.clone(), to_bytes(&users)?);
        ctx.gateway.write(batch).await?;
        Ok(vec![prop_addr, subject_attr])
    }
}

/// Rejects a manager-change proposal.
pub struct RejectManagerChangeHandler;

#[async_trait]
impl MessageHandler for RejectManagerChangeHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: DecidePayload = decode_content(content)?;
        require_field(&payload.proposal_id, "proposal_id")?;
        require_field(&payload.object_id, "object_id")?;
        require_field(&payload.related_id, "related_id")?;

        let prop_addr = proposal_address(&payload.object_id, &payload.related_id);
        ctx.require_inputs([&prop_addr])?;
        ctx.require_outputs([&prop_addr])?;

        let entries = ctx.gateway.fetch(std::slice::from_ref(&prop_addr)).await?;

        let mut proposals: ProposalContainer = decode_or_default(&entries, &prop_addr)?;
        let opener = take_open_proposal(&mut proposals, &payload, ProposalKind::UpdateUserManager)?
            .opener
            .clone();

        let authorized = ctx.signer == opener
            || ctx.signer == payload.related_id
            || is_hierarchical_manager_of(
                ctx.gateway,
                ctx.config.max_manager_hops,
                ctx.signer,
                &payload.related_id,
            )
            .await?;
        if !authorized {
            return Err(EngineError::Unauthorized {
                signer: ctx.signer.to_owned(),
                reason: "only the opener or the proposed manager may reject".into(),
            });
        }

        let proposal = take_open_proposal(&mut proposals, &payload, ProposalKind::UpdateUserManager)?;
        proposal.close(ProposalStatus::Rejected, &payload.reason);
        debug!(proposal_id = %payload.proposal_id, "manager change rejected");

        let mut batch = Entries::new();
        batch.insert(prop_addr.clone(), to_bytes(&proposals)?);
        ctx.gateway.write(batch).await?;
        Ok(vec![prop_addr])
    }
}
