//! Dispatch metadata for each relationship kind.
//!
//! The original system modeled the {object × relationship × verb} matrix as
//! a class hierarchy; here it is a small value type that tells the generic
//! handlers which addresses a relationship lives at, what kind of entity
//! sits on each end, and which set approves changes to it.

use rbac_addressing::{
    role_admins_address, role_attributes_address, role_members_address, role_owners_address,
    role_tasks_address, task_admins_address, task_attributes_address, task_owners_address,
    user_attributes_address, Address,
};
use rbac_types::RelationshipKind;

/// What kind of entity an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityClass {
    User,
    Role,
    Task,
}

/// Which relationship set decides confirm/reject for a proposal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproverSet {
    /// Owners decide membership and task grants.
    Owners,
    /// Admins decide changes to the owner and admin sets themselves.
    Admins,
}

/// Address and authorization metadata for one relationship kind.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipSpec {
    pub kind: RelationshipKind,
}

impl RelationshipSpec {
    pub const fn of(kind: RelationshipKind) -> Self {
        Self { kind }
    }

    /// The entity class of the parent object.
    pub fn object_class(&self) -> EntityClass {
        match self.kind {
            RelationshipKind::RoleMember
            | RelationshipKind::RoleOwner
            | RelationshipKind::RoleAdmin
            | RelationshipKind::RoleTask => EntityClass::Role,
            RelationshipKind::TaskOwner | RelationshipKind::TaskAdmin => EntityClass::Task,
        }
    }

    /// The entity class of the related identifier.
    pub fn related_class(&self) -> EntityClass {
        match self.kind {
            RelationshipKind::RoleTask => EntityClass::Task,
            _ => EntityClass::User,
        }
    }

    /// Whether the related user may open proposals about themselves.
    /// Task grants have no acting user on the related side.
    pub fn self_serve(&self) -> bool {
        self.related_class() == EntityClass::User
    }

    /// Address of the relationship container being changed.
    pub fn container_address(&self, object_id: &str) -> Address {
        match self.kind {
            RelationshipKind::RoleMember => role_members_address(object_id),
            RelationshipKind::RoleOwner => role_owners_address(object_id),
            RelationshipKind::RoleAdmin => role_admins_address(object_id),
            RelationshipKind::RoleTask => role_tasks_address(object_id),
            RelationshipKind::TaskOwner => task_owners_address(object_id),
            RelationshipKind::TaskAdmin => task_admins_address(object_id),
        }
    }

    /// Attribute address of the parent object.
    pub fn object_attributes_address(&self, object_id: &str) -> Address {
        match self.object_class() {
            EntityClass::Role => role_attributes_address(object_id),
            EntityClass::Task => task_attributes_address(object_id),
            EntityClass::User => user_attributes_address(object_id),
        }
    }

    /// Attribute address of the related entity.
    pub fn related_attributes_address(&self, related_id: &str) -> Address {
        match self.related_class() {
            EntityClass::Task => task_attributes_address(related_id),
            _ => user_attributes_address(related_id),
        }
    }

    /// Which set approves proposals of this kind.
    pub fn approvers(&self) -> ApproverSet {
        match self.kind {
            RelationshipKind::RoleMember | RelationshipKind::RoleTask => ApproverSet::Owners,
            RelationshipKind::RoleOwner
            | RelationshipKind::RoleAdmin
            | RelationshipKind::TaskOwner
            | RelationshipKind::TaskAdmin => ApproverSet::Admins,
        }
    }

    /// Address of the approver relationship container.
    pub fn approver_address(&self, object_id: &str) -> Address {
        match (self.object_class(), self.approvers()) {
            (EntityClass::Role, ApproverSet::Owners) => role_owners_address(object_id),
            (EntityClass::Role, ApproverSet::Admins) => role_admins_address(object_id),
            (EntityClass::Task, _) => task_admins_address(object_id),
            // Roles and tasks are the only parents of relationship sets.
            (EntityClass::User, _) => unreachable!("users own no relationship sets"),
        }
    }

    /// Address of the object's owner container, used for propose-time
    /// authorization.
    pub fn owner_address(&self, object_id: &str) -> Address {
        match self.object_class() {
            EntityClass::Role => role_owners_address(object_id),
            _ => task_owners_address(object_id),
        }
    }

    /// Address of the object's admin container, used for propose-time
    /// authorization.
    pub fn admin_address(&self, object_id: &str) -> Address {
        match self.object_class() {
            EntityClass::Role => role_admins_address(object_id),
            _ => task_admins_address(object_id),
        }
    }
}
