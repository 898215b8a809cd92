//! Configuration data models
//!
//! This module defines all configuration structures used throughout the backend.

#![allow(missing_docs)]

pub mod app;
pub mod auth;
pub mod logging;
pub mod resolver;
pub mod storage;

// Re-export all configuration types
pub use app::*;
pub use auth::*;
pub use logging::*;
pub use resolver::*;
pub use storage::*;

/// Default database URL
pub fn default_database_url() -> String {
    "sqlite://data/rbac.db?mode=rwc".to_string()
}

/// Default maximum database connections
pub fn default_max_connections() -> u32 {
    10
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

/// Default resolution timeout in milliseconds (0 disables it)
pub fn default_resolver_timeout_ms() -> u64 {
    5000
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

/// Parse an optional environment value
pub(crate) fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> crate::utils::error::Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            crate::utils::error::RbacError::Config(format!("Invalid value for {}: {}", key, raw))
        }),
    }
}
