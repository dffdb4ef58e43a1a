//! Inbound Ports (Driving Ports / API)

use crate::domain::errors::EngineError;
use async_trait::async_trait;
use rbac_addressing::Address;
use rbac_types::{MessageType, TransactionEnvelope};

/// Receipt returned when an invocation commits.
///
/// Hosts feed read-side consumers (search index, directory sync) from the
/// written address list.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// The tag that was dispatched.
    pub message_type: MessageType,
    /// Every address this invocation wrote.
    pub written: Vec<Address>,
}

/// Primary transaction processing API.
#[async_trait]
pub trait TransactionProcessingApi: Send + Sync {
    /// Apply one signed envelope against current ledger state.
    ///
    /// Either completes and commits all of its writes, or fails with none of
    /// them applied. Every failure resolves to an [`EngineError`]; nothing
    /// panics past the dispatch router.
    async fn apply(&self, envelope: &TransactionEnvelope) -> Result<ApplyOutcome, EngineError>;
}
