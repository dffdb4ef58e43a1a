//! Propose handlers: open a new OPEN proposal after checking authority,
//! polarity, and the single-open invariant.

use crate::application::handlers::{decode_content, require_field, HandlerContext, MessageHandler};
use crate::application::hierarchy::is_hierarchical_manager_of;
use crate::domain::entity_rules::{
    assert_is_role, assert_is_task, assert_is_user, decode_or_default, get_user,
};
use crate::domain::errors::EngineError;
use crate::domain::proposal_rules::has_no_open_proposal;
use crate::domain::relationships::{EntityClass, RelationshipSpec};
use crate::domain::Entries;
use async_trait::async_trait;
use rbac_addressing::{proposal_address, user_attributes_address, Address};
use rbac_types::{
    to_bytes, Action, Proposal, ProposalContainer, ProposalKind, ProposePayload,
    RelationshipContainer, RelationshipKind,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Opens a proposal to add or remove one identifier in a relationship set.
pub struct ProposeMembershipHandler {
    spec: RelationshipSpec,
    action: Action,
}

impl ProposeMembershipHandler {
    pub fn new(relationship: RelationshipKind, action: Action) -> Self {
        Self {
            spec: RelationshipSpec::of(relationship),
            action,
        }
    }

    fn kind(&self) -> ProposalKind {
        ProposalKind::membership(self.spec.kind, self.action)
    }

    /// The acting user themselves, their hierarchical manager, or an
    /// existing owner/admin of the object may open the proposal.
    async fn authorize(
        &self,
        ctx: &HandlerContext<'_>,
        entries: &Entries,
        object_id: &str,
        related_id: &str,
    ) -> Result<(), EngineError> {
        if self.spec.self_serve() && ctx.signer == related_id {
            return Ok(());
        }

        let owners: RelationshipContainer =
            decode_or_default(entries, &self.spec.owner_address(object_id))?;
        let admins: RelationshipContainer =
            decode_or_default(entries, &self.spec.admin_address(object_id))?;
        if owners.contains(object_id, ctx.signer) || admins.contains(object_id, ctx.signer) {
            return Ok(());
        }

        if self.spec.self_serve()
            && is_hierarchical_manager_of(
                ctx.gateway,
                ctx.config.max_manager_hops,
                ctx.signer,
                related_id,
            )
            .await?
        {
            return Ok(());
        }

        Err(EngineError::Unauthorized {
            signer: ctx.signer.to_owned(),
            reason: format!("cannot open proposals about {related_id} on {object_id}"),
        })
    }
}

#[async_trait]
impl MessageHandler for ProposeMembershipHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: ProposePayload = decode_content(content)?;
        require_field(&payload.proposal_id, "proposal_id")?;
        require_field(&payload.object_id, "object_id")?;
        require_field(&payload.related_id, "related_id")?;

        let object_attr = self.spec.object_attributes_address(&payload.object_id);
        let related_attr = self.spec.related_attributes_address(&payload.related_id);
        let container_addr = self.spec.container_address(&payload.object_id);
        let prop_addr = proposal_address(&payload.object_id, &payload.related_id);

        let reads: BTreeSet<Address> = [
            object_attr.clone(),
            related_attr.clone(),
            container_addr.clone(),
            prop_addr.clone(),
            self.spec.owner_address(&payload.object_id),
            self.spec.admin_address(&payload.object_id),
        ]
        .into();
        ctx.require_inputs(&reads)?;
        ctx.require_outputs([&prop_addr])?;

        let reads: Vec<Address> = reads.into_iter().collect();
        let entries = ctx.gateway.fetch(&reads).await?;

        match self.spec.object_class() {
            EntityClass::Role => assert_is_role(&entries, &payload.object_id, &object_attr)?,
            EntityClass::Task => assert_is_task(&entries, &payload.object_id, &object_attr)?,
            EntityClass::User => assert_is_user(&entries, &payload.object_id, &object_attr)?,
        }
        match self.spec.related_class() {
            EntityClass::Task => assert_is_task(&entries, &payload.related_id, &related_attr)?,
            _ => assert_is_user(&entries, &payload.related_id, &related_attr)?,
        }

        self.authorize(ctx, &entries, &payload.object_id, &payload.related_id)
            .await?;

        // Polarity: adding needs absence, removing needs presence. Both are
        // validation failures caught before any write, never silent no-ops.
        let relationships: RelationshipContainer = decode_or_default(&entries, &container_addr)?;
        let present = relationships.contains(&payload.object_id, &payload.related_id);
        match self.action {
            Action::Add if present => {
                return Err(EngineError::AlreadyRelated {
                    object_id: payload.object_id,
                    identifier: payload.related_id,
                })
            }
            Action::Remove if !present => {
                return Err(EngineError::NotRelated {
                    object_id: payload.object_id,
                    identifier: payload.related_id,
                })
            }
            _ => {}
        }

        if !has_no_open_proposal(
            &entries,
            &prop_addr,
            &payload.object_id,
            &payload.related_id,
            self.kind(),
        )? {
            return Err(EngineError::DuplicateProposal {
                object_id: payload.object_id,
                related_id: payload.related_id,
            });
        }

        debug!(
            proposal_id = %payload.proposal_id,
            object_id = %payload.object_id,
            related_id = %payload.related_id,
            "opening proposal"
        );

        let mut container: ProposalContainer = decode_or_default(&entries, &prop_addr)?;
        container.proposals.push(Proposal {
            proposal_id: payload.proposal_id,
            kind: self.kind(),
            object_id: payload.object_id,
            related_id: payload.related_id,
            opener: ctx.signer.to_owned(),
            status: rbac_types::ProposalStatus::Open,
            open_reason: payload.reason,
            close_reason: String::new(),
            metadata: payload.metadata,
        });

        let mut batch = Entries::new();
        batch.insert(prop_addr.clone(), to_bytes(&container)?);
        ctx.gateway.write(batch).await?;
        Ok(vec![prop_addr])
    }
}

/// Opens a proposal to re-point a user's manager link.
///
/// `object_id` is the user, `related_id` the proposed new manager.
pub struct ProposeManagerChangeHandler;

#[async_trait]
impl MessageHandler for ProposeManagerChangeHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: ProposePayload = decode_content(content)?;
        require_field(&payload.proposal_id, "proposal_id")?;
        require_field(&payload.object_id, "object_id")?;
        require_field(&payload.related_id, "related_id")?;

        let subject_attr = user_attributes_address(&payload.object_id);
        let manager_attr = user_attributes_address(&payload.related_id);
        let prop_addr = proposal_address(&payload.object_id, &payload.related_id);

        let reads: BTreeSet<Address> =
            [subject_attr.clone(), manager_attr.clone(), prop_addr.clone()].into();
        ctx.require_inputs(&reads)?;
        ctx.require_outputs([&prop_addr])?;

        let reads: Vec<Address> = reads.into_iter().collect();
        let entries = ctx.gateway.fetch(&reads).await?;

        let subject = get_user(&entries, &payload.object_id, &subject_attr)?;
        assert_is_user(&entries, &payload.related_id, &manager_attr)?;

        if subject.manager_id.as_deref() == Some(payload.related_id.as_str()) {
            return Err(EngineError::AlreadyRelated {
                object_id: payload.object_id,
                identifier: payload.related_id,
            });
        }

        let by_self = ctx.signer == payload.object_id;
        let by_current_manager = subject.manager_id.as_deref() == Some(ctx.signer);
        let by_chain = by_self
            || by_current_manager
            || is_hierarchical_manager_of(
                ctx.gateway,
                ctx.config.max_manager_hops,
                ctx.signer,
                &payload.object_id,
            )
            .await?;
        if !by_chain {
            return Err(EngineError::Unauthorized {
                signer: ctx.signer.to_owned(),
                reason: format!("cannot propose a manager change for {}", payload.object_id),
            });
        }

        if !has_no_open_proposal(
            &entries,
            &prop_addr,
            &payload.object_id,
            &payload.related_id,
            ProposalKind::UpdateUserManager,
        )? {
            return Err(EngineError::DuplicateProposal {
                object_id: payload.object_id,
                related_id: payload.related_id,
            });
        }

        debug!(
            proposal_id = %payload.proposal_id,
            user_id = %payload.object_id,
            new_manager = %payload.related_id,
            "opening manager-change proposal"
        );

        let mut container: ProposalContainer = decode_or_default(&entries, &prop_addr)?;
        container.proposals.push(Proposal {
            proposal_id: payload.proposal_id,
            kind: ProposalKind::UpdateUserManager,
            object_id: payload.object_id,
            related_id: payload.related_id,
            opener: ctx.signer.to_owned(),
            status: rbac_types::ProposalStatus::Open,
            open_reason: payload.reason,
            close_reason: String::new(),
            metadata: payload.metadata,
        });

        let mut batch = Entries::new();
        batch.insert(prop_addr.clone(), to_bytes(&container)?);
        ctx.gateway.write(batch).await?;
        Ok(vec![prop_addr])
    }
}
