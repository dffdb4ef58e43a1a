//! In-memory implementation of `LedgerService` for tests and thin hosts.

use crate::domain::errors::EngineError;
use crate::domain::Entries;
use crate::ports::outbound::LedgerService;
use async_trait::async_trait;
use rbac_addressing::Address;
use std::sync::RwLock;

/// A ledger backed by a process-local map.
///
/// Mirrors the contract of the real state service: get returns only the
/// addresses that hold entries, set applies the whole batch.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<Entries>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries::new()),
        }
    }

    /// Copy out the whole ledger, mostly for determinism assertions in
    /// tests.
    pub fn snapshot(&self) -> Result<Entries, EngineError> {
        let entries = self.entries.read().map_err(|_| EngineError::LockPoisoned)?;
        Ok(entries.clone())
    }

    /// Raw read of one address.
    pub fn get_raw(&self, address: &Address) -> Result<Option<Vec<u8>>, EngineError> {
        let entries = self.entries.read().map_err(|_| EngineError::LockPoisoned)?;
        Ok(entries.get(address).cloned())
    }
}

#[async_trait]
impl LedgerService for InMemoryLedger {
    async fn get_entries(&self, addresses: &[Address]) -> Result<Entries, EngineError> {
        let entries = self.entries.read().map_err(|_| EngineError::LockPoisoned)?;
        Ok(addresses
            .iter()
            .filter_map(|a| entries.get(a).map(|bytes| (a.clone(), bytes.clone())))
            .collect())
    }

    async fn set_entries(&self, batch: Entries) -> Result<(), EngineError> {
        let mut entries = self.entries.write().map_err(|_| EngineError::LockPoisoned)?;
        entries.extend(batch);
        Ok(())
    }
}
