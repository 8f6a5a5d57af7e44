//! Tracing subscriber initialisation
//!
//! `RUST_LOG`, when set, overrides the configured level.

use crate::config::LoggingConfig;
use crate::utils::error::{RelayError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// Returns `Ok(false)` when a global subscriber was already installed; the existing one is
/// left in place.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let env_override = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(&config.level, env_override)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_ids(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    Ok(installed.is_ok())
}

/// Filter from `env_override` when present and non-empty, else from `level`
pub fn build_filter(level: &str, env_override: Option<String>) -> Result<EnvFilter> {
    let directives = env_override
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| level.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|e| RelayError::Logging(format!("invalid log filter '{}': {}", directives, e)))
}
