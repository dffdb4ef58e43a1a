//! # Message Payloads
//!
//! One struct per message verb, with explicit named fields. The
//! `message_type` tag on the envelope decides which struct the opaque
//! content bytes decode into; no field is ever looked up by name at runtime.

use crate::entities::Metadata;
use serde::{Deserialize, Serialize};

/// Content of a `CreateUser` message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserPayload {
    pub user_id: String,
    pub name: String,
    pub manager_id: Option<String>,
    pub metadata: Metadata,
}

/// Content of a `CreateRole` message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRolePayload {
    pub role_id: String,
    pub name: String,
    /// Initial owner set; each must already exist as a user.
    pub owners: Vec<String>,
    /// Initial admin set; each must already exist as a user.
    pub admins: Vec<String>,
    pub metadata: Metadata,
}

/// Content of a `CreateTask` message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskPayload {
    pub task_id: String,
    pub name: String,
    pub owners: Vec<String>,
    pub admins: Vec<String>,
    pub metadata: Metadata,
}

/// Content of every `Propose(_)` message.
///
/// `object_id` is the parent entity (role, task, or — for manager changes —
/// the user); `related_id` is the identifier being added/removed or the
/// proposed new manager. The proposal id is client-generated so the opener
/// can reference it in later confirm/reject messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposePayload {
    pub proposal_id: String,
    pub object_id: String,
    pub related_id: String,
    pub reason: String,
    pub metadata: Metadata,
}

/// Content of every `Confirm(_)` and `Reject(_)` message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecidePayload {
    pub proposal_id: String,
    pub object_id: String,
    pub related_id: String,
    pub reason: String,
}
