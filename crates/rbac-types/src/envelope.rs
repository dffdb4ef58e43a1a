//! # `TransactionEnvelope`
//!
//! The fixed-schema wrapper around every change-request the engine receives.
//!
//! ## Contract
//!
//! - The `message_type` tag is the only thing inspected before dispatch;
//!   `content` is decoded by the selected handler, never earlier.
//! - `inputs`/`outputs` are the declared read and write address sets; the
//!   host platform schedules non-overlapping envelopes in parallel and the
//!   engine rejects any access outside the declaration.
//! - `signer` is the identity whose signature the surrounding platform has
//!   already verified; the engine treats the signature bytes as opaque.

use crate::entities::ProposalKind;
use rbac_addressing::Address;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

/// The verb × object tag selecting a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MessageType {
    CreateUser,
    CreateRole,
    CreateTask,
    Propose(ProposalKind),
    Confirm(ProposalKind),
    Reject(ProposalKind),
}

impl MessageType {
    /// Every routable tag: three creates plus the propose/confirm/reject
    /// triple over every proposal kind.
    pub fn all() -> Vec<MessageType> {
        let mut tags = vec![
            MessageType::CreateUser,
            MessageType::CreateRole,
            MessageType::CreateTask,
        ];
        for kind in ProposalKind::ALL {
            tags.push(MessageType::Propose(kind));
            tags.push(MessageType::Confirm(kind));
            tags.push(MessageType::Reject(kind));
        }
        tags
    }
}

/// A signed, opaque change-request with its declared address sets.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// Which handler this message is for.
    pub message_type: MessageType,
    /// Bincode-encoded payload, schema fixed per tag.
    pub content: Vec<u8>,
    /// Declared read set.
    pub inputs: Vec<Address>,
    /// Declared write set.
    pub outputs: Vec<Address>,
    /// Identity of the already-verified signer.
    pub signer: String,
    /// Unix timestamp (seconds) when the envelope was created.
    pub timestamp: u64,
    /// Signature over the content, verified by the surrounding platform
    /// before the envelope reaches the engine. Opaque here.
    #[serde_as(as = "Bytes")]
    pub signature: [u8; 64],
}

impl TransactionEnvelope {
    /// Build an envelope with an unverified placeholder signature, for hosts
    /// and tests that sit behind a platform which signs separately.
    pub fn unsigned(
        message_type: MessageType,
        content: Vec<u8>,
        inputs: Vec<Address>,
        outputs: Vec<Address>,
        signer: &str,
        timestamp: u64,
    ) -> Self {
        Self {
            message_type,
            content,
            inputs,
            outputs,
            signer: signer.to_owned(),
            timestamp,
            signature: [0u8; 64],
        }
    }
}
