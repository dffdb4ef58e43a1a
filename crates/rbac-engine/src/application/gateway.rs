//! The state gateway: bounded-latency access to the external ledger.

use crate::domain::errors::EngineError;
use crate::domain::Entries;
use crate::ports::outbound::LedgerService;
use rbac_addressing::Address;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Thin adapter around the ledger's get/set-by-address calls.
///
/// Every call is wrapped in a timeout. An elapsed timeout is a
/// [`EngineError::GatewayTimeout`], never a silent "not found" and never an
/// internal retry; the invocation aborts and the platform may resubmit.
pub struct StateGateway {
    ledger: Arc<dyn LedgerService>,
    timeout: Duration,
}

impl StateGateway {
    pub fn new(ledger: Arc<dyn LedgerService>, timeout: Duration) -> Self {
        Self { ledger, timeout }
    }

    fn timeout_error(&self) -> EngineError {
        EngineError::GatewayTimeout {
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }

    /// Fetch current entries for `addresses`. Missing addresses are absent
    /// from the map.
    pub async fn fetch(&self, addresses: &[Address]) -> Result<Entries, EngineError> {
        debug!(count = addresses.len(), "fetching ledger entries");
        tokio::time::timeout(self.timeout, self.ledger.get_entries(addresses))
            .await
            .map_err(|_| self.timeout_error())?
    }

    /// Fetch one address, or `None` when no entry exists there.
    pub async fn fetch_optional(&self, address: &Address) -> Result<Option<Vec<u8>>, EngineError> {
        let mut entries = self.fetch(std::slice::from_ref(address)).await?;
        Ok(entries.remove(address))
    }

    /// Fetch one address, failing with `NotFound` when the entry is absent.
    pub async fn fetch_one(&self, address: &Address) -> Result<Vec<u8>, EngineError> {
        self.fetch_optional(address)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                address: address.clone(),
            })
    }

    /// Commit a batch of entries.
    pub async fn write(&self, entries: Entries) -> Result<(), EngineError> {
        debug!(count = entries.len(), "writing ledger entries");
        tokio::time::timeout(self.timeout, self.ledger.set_entries(entries))
            .await
            .map_err(|_| self.timeout_error())?
    }
}
