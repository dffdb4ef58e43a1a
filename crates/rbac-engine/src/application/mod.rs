//! Application layer: gateway, handlers, router, and the orchestrating
//! service.

pub mod declaration;
pub mod gateway;
pub mod handlers;
pub mod hierarchy;
pub mod router;
pub mod service;
