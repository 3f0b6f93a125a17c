//! Item module: per-user owned records with owner-or-superuser access
//! control over the generic entity store.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;
