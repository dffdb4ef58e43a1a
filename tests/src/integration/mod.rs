//! Cross-crate scenarios exercising the full create → propose → decide
//! workflow through the public engine API.

pub mod determinism;
pub mod lifecycle;
pub mod manager_chain;
