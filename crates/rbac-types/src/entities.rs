//! # Core Domain Entities
//!
//! The ledger-resident records: users, roles, tasks, relationships, and
//! proposals, plus the enums that key the propose/confirm/reject workflow.
//!
//! Metadata maps are `BTreeMap` rather than `HashMap` so serialization is
//! byte-identical across replicas.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form metadata attached to entities and proposals.
pub type Metadata = BTreeMap<String, String>;

/// A user of the directory.
///
/// `manager_id` is a self-reference into the manager hierarchy; the links
/// form a directed forest and following them must terminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Public-key-like identifier, never empty.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Identifier of this user's manager, if any.
    pub manager_id: Option<String>,
    /// Free-form metadata.
    pub metadata: Metadata,
}

/// A role grouping members, owners, admins, and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// UUID-like identifier, never empty.
    pub role_id: String,
    /// Display name.
    pub name: String,
    /// Free-form metadata.
    pub metadata: Metadata,
}

/// A task that roles can be granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// UUID-like identifier, never empty.
    pub task_id: String,
    /// Display name.
    pub name: String,
    /// Free-form metadata.
    pub metadata: Metadata,
}

/// Which side of a relationship change a proposal requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Add,
    Remove,
}

/// A relationship set owned by a parent entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    RoleMember,
    RoleOwner,
    RoleAdmin,
    RoleTask,
    TaskOwner,
    TaskAdmin,
}

impl RelationshipKind {
    /// Every relationship kind.
    pub const ALL: [RelationshipKind; 6] = [
        RelationshipKind::RoleMember,
        RelationshipKind::RoleOwner,
        RelationshipKind::RoleAdmin,
        RelationshipKind::RoleTask,
        RelationshipKind::TaskOwner,
        RelationshipKind::TaskAdmin,
    ];
}

/// The kind of change a proposal requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProposalKind {
    /// Add or remove an identifier in one of the relationship sets.
    Membership {
        relationship: RelationshipKind,
        action: Action,
    },
    /// Re-point a user's `manager_id`.
    UpdateUserManager,
}

impl ProposalKind {
    /// Every proposal kind: the full relationship × action matrix plus the
    /// manager change.
    pub const ALL: [ProposalKind; 13] = [
        ProposalKind::membership(RelationshipKind::RoleMember, Action::Add),
        ProposalKind::membership(RelationshipKind::RoleMember, Action::Remove),
        ProposalKind::membership(RelationshipKind::RoleOwner, Action::Add),
        ProposalKind::membership(RelationshipKind::RoleOwner, Action::Remove),
        ProposalKind::membership(RelationshipKind::RoleAdmin, Action::Add),
        ProposalKind::membership(RelationshipKind::RoleAdmin, Action::Remove),
        ProposalKind::membership(RelationshipKind::RoleTask, Action::Add),
        ProposalKind::membership(RelationshipKind::RoleTask, Action::Remove),
        ProposalKind::membership(RelationshipKind::TaskOwner, Action::Add),
        ProposalKind::membership(RelationshipKind::TaskOwner, Action::Remove),
        ProposalKind::membership(RelationshipKind::TaskAdmin, Action::Add),
        ProposalKind::membership(RelationshipKind::TaskAdmin, Action::Remove),
        ProposalKind::UpdateUserManager,
    ];

    /// Shorthand constructor for the membership variant.
    pub const fn membership(relationship: RelationshipKind, action: Action) -> Self {
        ProposalKind::Membership {
            relationship,
            action,
        }
    }
}

/// Lifecycle state of a proposal. `Open` transitions exactly once to either
/// terminal state and is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Open,
    Confirmed,
    Rejected,
}

/// A pending multi-party-approved change to a relationship or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// UUID-like identifier, never empty.
    pub proposal_id: String,
    /// What change this proposal requests.
    pub kind: ProposalKind,
    /// The parent entity being changed (role, task, or user).
    pub object_id: String,
    /// The identifier being added/removed, or the proposed new manager.
    pub related_id: String,
    /// Who opened the proposal.
    pub opener: String,
    /// Current lifecycle state.
    pub status: ProposalStatus,
    /// Reason given when opening.
    pub open_reason: String,
    /// Reason given when closing, empty while open.
    pub close_reason: String,
    /// Free-form metadata.
    pub metadata: Metadata,
}

impl Proposal {
    /// Whether this proposal is still awaiting a decision.
    pub fn is_open(&self) -> bool {
        self.status == ProposalStatus::Open
    }

    /// Move to a terminal status with the decider's reason.
    ///
    /// Callers check `is_open` first; closing is not re-entrant.
    pub fn close(&mut self, status: ProposalStatus, reason: &str) {
        debug_assert!(self.is_open());
        debug_assert_ne!(status, ProposalStatus::Open);
        self.status = status;
        self.close_reason = reason.to_owned();
    }
}
