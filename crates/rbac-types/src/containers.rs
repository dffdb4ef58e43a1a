//! # Ledger Containers
//!
//! One container per ledger address. A container holds a `Vec` of records
//! rather than a single record, so identifiers whose hashes land in the same
//! bucket never clobber each other; lookups always scan for the exact
//! identifier.

use crate::entities::{Proposal, ProposalKind, Role, Task, User};
use serde::{Deserialize, Serialize};

/// Users whose attribute records share an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContainer {
    pub users: Vec<User>,
}

impl UserContainer {
    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.user_id == user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.get(user_id).is_some()
    }
}

/// Roles whose attribute records share an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleContainer {
    pub roles: Vec<Role>,
}

impl RoleContainer {
    pub fn contains(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r.role_id == role_id)
    }
}

/// Tasks whose attribute records share an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContainer {
    pub tasks: Vec<Task>,
}

impl TaskContainer {
    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|t| t.task_id == task_id)
    }
}

/// The set of identifiers related to one parent under one relationship kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub object_id: String,
    pub identifiers: Vec<String>,
}

/// Relationship sets whose parents share an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipContainer {
    pub relationships: Vec<Relationship>,
}

impl RelationshipContainer {
    /// Whether `identifier` is related to `object_id`.
    pub fn contains(&self, object_id: &str, identifier: &str) -> bool {
        self.relationships
            .iter()
            .any(|r| r.object_id == object_id && r.identifiers.iter().any(|i| i == identifier))
    }

    /// Add `identifier` to the parent's set. Returns false when already
    /// present; the set never holds duplicates.
    pub fn insert(&mut self, object_id: &str, identifier: &str) -> bool {
        if self.contains(object_id, identifier) {
            return false;
        }
        match self
            .relationships
            .iter_mut()
            .find(|r| r.object_id == object_id)
        {
            Some(relationship) => relationship.identifiers.push(identifier.to_owned()),
            None => self.relationships.push(Relationship {
                object_id: object_id.to_owned(),
                identifiers: vec![identifier.to_owned()],
            }),
        }
        true
    }

    /// Remove `identifier` from the parent's set. Returns false when it was
    /// not present.
    pub fn remove(&mut self, object_id: &str, identifier: &str) -> bool {
        let Some(relationship) = self
            .relationships
            .iter_mut()
            .find(|r| r.object_id == object_id)
        else {
            return false;
        };
        let before = relationship.identifiers.len();
        relationship.identifiers.retain(|i| i != identifier);
        relationship.identifiers.len() < before
    }
}

/// Proposals whose (object, target) pairs share an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalContainer {
    pub proposals: Vec<Proposal>,
}

impl ProposalContainer {
    pub fn by_id(&self, proposal_id: &str) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.proposal_id == proposal_id)
    }

    pub fn by_id_mut(&mut self, proposal_id: &str) -> Option<&mut Proposal> {
        self.proposals
            .iter_mut()
            .find(|p| p.proposal_id == proposal_id)
    }

    /// The open proposal for this exact (object, target, kind) tuple, if any.
    /// At most one can exist at a time.
    pub fn open_for(
        &self,
        object_id: &str,
        related_id: &str,
        kind: ProposalKind,
    ) -> Option<&Proposal> {
        self.proposals.iter().find(|p| {
            p.is_open()
                && p.object_id == object_id
                && p.related_id == related_id
                && p.kind == kind
        })
    }
}
