//! Fixtures shared by the integration scenarios.

use rbac_engine::{
    declared_sets, ApplyOutcome, EngineError, InMemoryLedger, TransactionProcessingApi,
    TransactionProcessingService,
};
use rbac_types::{
    to_bytes, CreateRolePayload, CreateTaskPayload, CreateUserPayload, DecidePayload, MessageType,
    Metadata, ProposePayload, TransactionEnvelope,
};
use serde::Serialize;
use std::sync::Arc;

const TIMESTAMP: u64 = 1_700_000_000;

/// One engine instance over one in-memory ledger.
pub struct Harness {
    pub ledger: Arc<InMemoryLedger>,
    pub service: TransactionProcessingService,
}

impl Harness {
    pub fn new() -> Self {
        let ledger = Arc::new(InMemoryLedger::new());
        let service = TransactionProcessingService::new(ledger.clone());
        Self { ledger, service }
    }

    /// Encode, declare, and apply one message as `signer`.
    pub async fn apply<T: Serialize>(
        &self,
        message_type: MessageType,
        payload: &T,
        signer: &str,
    ) -> Result<ApplyOutcome, EngineError> {
        let content = to_bytes(payload)?;
        let (inputs, outputs) = declared_sets(message_type, &content)?;
        let envelope = TransactionEnvelope::unsigned(
            message_type,
            content,
            inputs,
            outputs,
            signer,
            TIMESTAMP,
        );
        self.service.apply(&envelope).await
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn user(user_id: &str, manager_id: Option<&str>) -> CreateUserPayload {
    CreateUserPayload {
        user_id: user_id.to_owned(),
        name: format!("User {user_id}"),
        manager_id: manager_id.map(str::to_owned),
        metadata: Metadata::new(),
    }
}

pub fn role(role_id: &str, owners: &[&str], admins: &[&str]) -> CreateRolePayload {
    CreateRolePayload {
        role_id: role_id.to_owned(),
        name: format!("Role {role_id}"),
        owners: owners.iter().map(|s| (*s).to_owned()).collect(),
        admins: admins.iter().map(|s| (*s).to_owned()).collect(),
        metadata: Metadata::new(),
    }
}

pub fn task(task_id: &str, owners: &[&str], admins: &[&str]) -> CreateTaskPayload {
    CreateTaskPayload {
        task_id: task_id.to_owned(),
        name: format!("Task {task_id}"),
        owners: owners.iter().map(|s| (*s).to_owned()).collect(),
        admins: admins.iter().map(|s| (*s).to_owned()).collect(),
        metadata: Metadata::new(),
    }
}

pub fn proposal(proposal_id: &str, object_id: &str, related_id: &str) -> ProposePayload {
    ProposePayload {
        proposal_id: proposal_id.to_owned(),
        object_id: object_id.to_owned(),
        related_id: related_id.to_owned(),
        reason: String::new(),
        metadata: Metadata::new(),
    }
}

pub fn decision(proposal_id: &str, object_id: &str, related_id: &str) -> DecidePayload {
    DecidePayload {
        proposal_id: proposal_id.to_owned(),
        object_id: object_id.to_owned(),
        related_id: related_id.to_owned(),
        reason: String::new(),
    }
}
