//! Top-level application configuration

use super::*;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Resolver configuration
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_lookup(lookup)?;
        Ok(config)
    }

    /// Overwrite every field whose key the lookup knows
    pub fn apply_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("RBAC_DATABASE_URL") {
            self.storage.database.url = url;
        }
        if let Some(value) = parse_env(&lookup, "RBAC_DATABASE_MAX_CONNECTIONS")? {
            self.storage.database.max_connections = value;
        }
        if let Some(value) = parse_env(&lookup, "RBAC_DATABASE_CONNECTION_TIMEOUT")? {
            self.storage.database.connection_timeout = value;
        }
        if let Some(value) = parse_env(&lookup, "RBAC_DATABASE_SQLX_LOGGING")? {
            self.storage.database.sqlx_logging = value;
        }
        if let Some(value) = parse_env(&lookup, "RBAC_ALLOW_REGISTRATION")? {
            self.auth.allow_registration = value;
        }
        if let Some(value) = parse_env(&lookup, "RBAC_EXTERNAL_LOGIN_ENABLED")? {
            self.auth.external_login_enabled = value;
        }
        if let Some(value) = parse_env(&lookup, "RBAC_RESOLVER_TIMEOUT_MS")? {
            self.resolver.timeout_ms = value;
        }
        if let Some(value) = parse_env(&lookup, "RBAC_RESOLVER_PARALLEL_LOOKUPS")? {
            self.resolver.parallel_lookups = value;
        }
        if let Some(level) = lookup("RBAC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(value) = parse_env(&lookup, "RBAC_LOG_JSON")? {
            self.logging.json = value;
        }

        Ok(())
    }
}
