//! Configuration for the transaction engine.

use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on one ledger get/set call (milliseconds). Elapsing it
    /// aborts the invocation with a gateway timeout, never a silent retry.
    pub gateway_timeout_ms: u64,
    /// Fixed bound on the manager-hierarchy walk. A chain longer than this
    /// (or a cycle) fails closed.
    pub max_manager_hops: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gateway_timeout_ms: 500,
            max_manager_hops: 5,
        }
    }
}
