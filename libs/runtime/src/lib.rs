//! Process-level plumbing: layered configuration and logging setup.

pub mod config;
pub mod logging;

pub use config::{AppConfig, AuthConfig, CliArgs, DatabaseConfig, LoggingConfig, ServerConfig};
