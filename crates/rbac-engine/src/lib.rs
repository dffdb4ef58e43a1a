//! # RBAC Transaction Engine
//!
//! Deterministic processing of signed change-requests against the
//! hash-addressed ledger: the same input state and the same message produce
//! byte-identical output state on every replica.
//!
//! ## Architecture
//!
//! - **Domain**: pure rules — entity validators, proposal workflow
//!   invariants, relationship dispatch metadata
//! - **Ports**: inbound (`TransactionProcessingApi`) and outbound
//!   (`LedgerService`)
//! - **Application**: the state gateway, message handlers, dispatch router,
//!   and the orchestrating service
//! - **Adapters**: in-memory ledger for tests and thin hosts
//!
//! The engine holds no shared mutable state between invocations. Each
//! message declares the exact address sets it reads and writes; the host
//! platform schedules non-overlapping messages in parallel and serializes
//! overlapping ones.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::memory_ledger::InMemoryLedger;
pub use application::declaration::declared_sets;
pub use application::gateway::StateGateway;
pub use application::router::DispatchRouter;
pub use application::service::TransactionProcessingService;
pub use config::EngineConfig;
pub use domain::errors::EngineError;
pub use domain::Entries;
pub use ports::inbound::{ApplyOutcome, TransactionProcessingApi};
pub use ports::outbound::LedgerService;
