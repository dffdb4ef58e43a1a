//! The dispatch table mapping every message tag to its handler.

use crate::application::handlers::create::{CreateRoleHandler, CreateTaskHandler, CreateUserHandler};
use crate::application::handlers::decide::{
    ConfirmManagerChangeHandler, ConfirmMembershipHandler, RejectManagerChangeHandler,
    RejectMembershipHandler,
};
use crate::application::handlers::propose::{ProposeManagerChangeHandler, ProposeMembershipHandler};
use crate::application::handlers::MessageHandler;
use crate::domain::errors::EngineError;
use rbac_types::{MessageType, ProposalKind};
use std::collections::BTreeMap;

/// Immutable tag-to-handler table, fully populated at construction.
///
/// Membership verbs register one handler instance per relationship kind and
/// action, so a handler never has to re-derive which sets it operates on
/// from the tag at dispatch time.
pub struct DispatchRouter {
    table: BTreeMap<MessageType, Box<dyn MessageHandler>>,
}

impl DispatchRouter {
    /// Build the full table covering every tag `MessageType::all` yields.
    pub fn standard() -> Self {
        let mut table: BTreeMap<MessageType, Box<dyn MessageHandler>> = BTreeMap::new();
        table.insert(MessageType::CreateUser, Box::new(CreateUserHandler));
        table.insert(MessageType::CreateRole, Box::new(CreateRoleHandler));
        table.insert(MessageType::CreateTask, Box::new(CreateTaskHandler));

        for kind in ProposalKind::ALL {
            match kind {
                ProposalKind::Membership {
                    relationship,
                    action,
                } => {
                    table.insert(
                        MessageType::Propose(kind),
                        Box::new(ProposeMembershipHandler::new(relationship, action)),
                    );
                    table.insert(
                        MessageType::Confirm(kind),
                        Box::new(ConfirmMembershipHandler::new(relationship, action)),
                    );
                    table.insert(
                        MessageType::Reject(kind),
                        Box::new(RejectMembershipHandler::new(relationship, action)),
                    );
                }
                ProposalKind::UpdateUserManager => {
                    table.insert(MessageType::Propose(kind), Box::new(ProposeManagerChangeHandler));
                    table.insert(MessageType::Confirm(kind), Box::new(ConfirmManagerChangeHandler));
                    table.insert(MessageType::Reject(kind), Box::new(RejectManagerChangeHandler));
                }
            }
        }

        Self { table }
    }

    pub fn handler(&self, tag: MessageType) -> Result<&dyn MessageHandler, EngineError> {
        self.table
            .get(&tag)
            .map(|handler| &**handler)
            .ok_or(EngineError::UnknownMessageType { tag })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for DispatchRouter {
    fn default() -> Self {
        Self::standard()
    }
}
