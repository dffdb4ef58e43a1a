//! Message handlers: one family per verb, parameterized over the
//! relationship kind they act on.
//!
//! Every handler follows the same shape: decode the payload, compute the
//! exact read/write address sets, check them against the envelope's
//! declaration, fetch, validate, build new entries, write the batch.

pub mod create;
pub mod decide;
pub mod propose;

use crate::application::gateway::StateGateway;
use crate::config::EngineConfig;
use crate::domain::errors::EngineError;
use async_trait::async_trait;
use rbac_addressing::Address;
use rbac_types::from_bytes;
use serde::de::DeserializeOwned;

/// Per-invocation context handed to every handler.
///
/// Borrowed from the envelope and the service; handlers keep no state of
/// their own between calls.
pub struct HandlerContext<'a> {
    pub gateway: &'a StateGateway,
    pub config: &'a EngineConfig,
    pub signer: &'a str,
    pub inputs: &'a [Address],
    pub outputs: &'a [Address],
}

impl HandlerContext<'_> {
    /// Ensure every address the handler will read was declared as an input.
    pub fn require_inputs<'b>(
        &self,
        addresses: impl IntoIterator<Item = &'b Address>,
    ) -> Result<(), EngineError> {
        for address in addresses {
            if !self.inputs.contains(address) {
                return Err(EngineError::UndeclaredAddress {
                    address: address.clone(),
                    direction: "input",
                });
            }
        }
        Ok(())
    }

    /// Ensure every address the handler will write was declared as an
    /// output.
    pub fn require_outputs<'b>(
        &self,
        addresses: impl IntoIterator<Item = &'b Address>,
    ) -> Result<(), EngineError> {
        for address in addresses {
            if !self.outputs.contains(address) {
                return Err(EngineError::UndeclaredAddress {
                    address: address.clone(),
                    direction: "output",
                });
            }
        }
        Ok(())
    }
}

/// One registered handler in the dispatch table.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Process the opaque content against current ledger state, returning
    /// the addresses written.
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError>;
}

/// Decode the opaque content bytes as the tag's payload schema.
///
/// A failure here is a property of the message, so it maps to a validation
/// failure, unlike decode faults on ledger-resident state.
pub(crate) fn decode_content<T: DeserializeOwned>(content: &[u8]) -> Result<T, EngineError> {
    from_bytes(content).map_err(|e| EngineError::MalformedContent(e.to_string()))
}

/// Reject empty identifier fields before any gateway call.
pub(crate) fn require_field(value: &str, field: &'static str) -> Result<(), EngineError> {
    if value.is_empty() {
        return Err(EngineError::EmptyIdentifier { field });
    }
    Ok(())
}
