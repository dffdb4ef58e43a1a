//! Inbound (driving) and outbound (driven) ports.

pub mod inbound;
pub mod outbound;
