//! Error types for the transaction engine.

use rbac_addressing::{Address, AddressError};
use rbac_types::{CodecError, MessageType};
use thiserror::Error;

/// All errors a message invocation can resolve to.
///
/// Everything here surfaces to the ledger platform as "reject this message";
/// nothing propagates past the dispatch router as a panic. Validation
/// failures are recoverable by resubmitting a corrected message; the rest
/// are transient infrastructure or internal faults.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Referenced identifier does not exist as a user.
    #[error("{id} is not a known user")]
    NotAUser { id: String },

    /// Referenced identifier does not exist as a role.
    #[error("{id} is not a known role")]
    NotARole { id: String },

    /// Referenced identifier does not exist as a task.
    #[error("{id} is not a known task")]
    NotATask { id: String },

    /// Created identity already occupies its attribute address.
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: &'static str, id: String },

    /// An address the handler needed was absent from the fetched entries.
    #[error("no entry found at {address}")]
    NotFound { address: Address },

    /// Signer does not hold the required authority for this message.
    #[error("signer {signer} is not authorized: {reason}")]
    Unauthorized { signer: String, reason: String },

    /// An open proposal already exists for this (object, target, kind).
    #[error("an open proposal already exists for {object_id} and {related_id}")]
    DuplicateProposal {
        object_id: String,
        related_id: String,
    },

    /// Proposal is missing or has already reached a terminal status.
    #[error("proposal {proposal_id} does not exist or is not open")]
    ProposalNotOpen { proposal_id: String },

    /// Proposal record disagrees with the decide message about what is
    /// being changed.
    #[error("proposal {proposal_id} does not match the requested change")]
    ProposalMismatch { proposal_id: String },

    /// Add requested for an identifier that is already in the set.
    #[error("{identifier} is already related to {object_id}")]
    AlreadyRelated {
        object_id: String,
        identifier: String,
    },

    /// Remove requested for an identifier that is not in the set.
    #[error("{identifier} is not related to {object_id}")]
    NotRelated {
        object_id: String,
        identifier: String,
    },

    /// Handler computed an address outside the envelope's declared sets.
    #[error("address {address} was not declared as an {direction}")]
    UndeclaredAddress {
        address: Address,
        direction: &'static str,
    },

    /// Message content bytes do not decode as the tag's payload schema.
    #[error("message content is malformed: {0}")]
    MalformedContent(String),

    /// A required identifier field was empty.
    #[error("required field '{field}' is empty")]
    EmptyIdentifier { field: &'static str },

    /// No handler is registered for the message tag.
    #[error("unknown message type: {tag:?}")]
    UnknownMessageType { tag: MessageType },

    /// Address failed parsing or classification.
    #[error("unknown address: {0}")]
    UnknownAddress(#[from] AddressError),

    /// The bounded-latency ledger call did not return in time.
    #[error("ledger gateway timed out after {timeout_ms} ms")]
    GatewayTimeout { timeout_ms: u64 },

    /// The external ledger service reported a failure.
    #[error("ledger service failed: {0}")]
    Ledger(String),

    /// A state lock was poisoned by a panicking writer.
    #[error("state lock poisoned")]
    LockPoisoned,

    /// Ledger-resident bytes failed to encode or decode.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl EngineError {
    /// Whether this error is a validation failure the caller can fix by
    /// resubmitting a corrected message, as opposed to a transient
    /// infrastructure or internal fault.
    pub fn is_validation_failure(&self) -> bool {
        !matches!(
            self,
            EngineError::GatewayTimeout { .. }
                | EngineError::Ledger(_)
                | EngineError::LockPoisoned
                | EngineError::Serialization(_)
        )
    }
}

impl From<CodecError> for EngineError {
    fn from(err: CodecError) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
