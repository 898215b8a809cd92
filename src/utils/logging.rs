//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::utils::error::{RbacError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber described by `config`
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_ids(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| RbacError::Internal(format!("Failed to install subscriber: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| RbacError::Config(format!("Invalid log filter '{}': {}", config.level, e)))
}
