//! Bincode helpers for ledger entry bytes and opaque message content.
//!
//! All ledger-resident types go through these two functions, so every
//! replica produces the same bytes for the same logical state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Serialization faults, split by direction: a failed decode is a property
/// of the incoming message, a failed encode is an internal fault.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode entry: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode entry: {0}")]
    Decode(#[source] bincode::Error),
}

/// Encode a container or payload to its ledger/wire bytes.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(value).map_err(CodecError::Encode)
}

/// Decode ledger/wire bytes back into a typed value.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    bincode::deserialize(bytes).map_err(CodecError::Decode)
}
