//! Shared utilities for stock-advisor
//!
//! This crate provides the ambient pieces used across the workspace:
//! tracing setup and loading of the model API key.

pub mod config;
pub mod logging;

pub use config::{ConfigError, SecretSource, Secrets, load_secrets};
pub use logging::init_tracing;
