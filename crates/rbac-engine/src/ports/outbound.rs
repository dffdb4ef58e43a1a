//! Outbound Ports (Driven Ports)

use crate::domain::errors::EngineError;
use crate::domain::Entries;
use async_trait::async_trait;
use rbac_addressing::Address;

/// The externally supplied get/set-by-address ledger state service.
///
/// The engine depends on nothing else from the surrounding platform. Calls
/// may take arbitrarily long; the [`StateGateway`](crate::StateGateway)
/// wraps them in a bounded-latency timeout.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Fetch the entries at `addresses`. Addresses without an entry are
    /// simply absent from the returned map, never an error.
    async fn get_entries(&self, addresses: &[Address]) -> Result<Entries, EngineError>;

    /// Write all `entries` as one atomic batch.
    async fn set_entries(&self, entries: Entries) -> Result<(), EngineError>;
}
