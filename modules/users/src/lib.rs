//! User directory module: registration, credential handling, authentication
//! and superuser administration over the generic entity store.

pub mod api;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;
