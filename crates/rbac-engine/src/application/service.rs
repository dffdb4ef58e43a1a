//! The transaction processing service: the engine's single inbound entry
//! point, wiring envelope sanity checks, dispatch, and outcome logging.

use crate::application::gateway::StateGateway;
use crate::application::handlers::HandlerContext;
use crate::application::router::DispatchRouter;
use crate::config::EngineConfig;
use crate::domain::errors::EngineError;
use crate::ports::inbound::{ApplyOutcome, TransactionProcessingApi};
use crate::ports::outbound::LedgerService;
use async_trait::async_trait;
use rbac_types::TransactionEnvelope;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Applies envelopes deterministically against ledger state.
pub struct TransactionProcessingService {
    gateway: StateGateway,
    config: EngineConfig,
    router: DispatchRouter,
}

impl TransactionProcessingService {
    pub fn new(ledger: Arc<dyn LedgerService>) -> Self {
        Self::with_config(ledger, EngineConfig::default())
    }

    pub fn with_config(ledger: Arc<dyn LedgerService>, config: EngineConfig) -> Self {
        let gateway = StateGateway::new(ledger, Duration::from_millis(config.gateway_timeout_ms));
        Self {
            gateway,
            config,
            router: DispatchRouter::standard(),
        }
    }
}

#[async_trait]
impl TransactionProcessingApi for TransactionProcessingService {
    async fn apply(&self, envelope: &TransactionEnvelope) -> Result<ApplyOutcome, EngineError> {
        if envelope.signer.is_empty() {
            return Err(EngineError::EmptyIdentifier { field: "signer" });
        }

        let handler = self.router.handler(envelope.message_type)?;
        let ctx = HandlerContext {
            gateway: &self.gateway,
            config: &self.config,
            signer: &envelope.signer,
            inputs: &envelope.inputs,
            outputs: &envelope.outputs,
        };

        match handler.handle(&ctx, &envelope.content).await {
            Ok(written) => {
                info!(
                    message_type = ?envelope.message_type,
                    signer = %envelope.signer,
                    written = written.len(),
                    "transaction applied"
                );
                Ok(ApplyOutcome {
                    message_type: envelope.message_type,
                    written,
                })
            }
            Err(err) if err.is_validation_failure() => {
                warn!(
                    message_type = ?envelope.message_type,
                    signer = %envelope.signer,
                    %err,
                    "transaction rejected"
                );
                Err(err)
            }
            Err(err) => {
                error!(
                    message_type = ?envelope.message_type,
                    signer = %envelope.signer,
                    %err,
                    "transaction aborted on internal fault"
                );
                Err(err)
            }
        }
    }
}
