//! Application configuration validators

use super::trait_def::Validate;
use crate::config::models::*;

/// Longest resolution deadline accepted, in milliseconds
const MAX_RESOLVER_TIMEOUT_MS: u64 = 60_000;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        self.storage.validate()?;
        self.auth.validate()?;
        self.resolver.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Validate for ResolverConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_ms > MAX_RESOLVER_TIMEOUT_MS {
            return Err(format!(
                "Resolver timeout should not exceed {}ms",
                MAX_RESOLVER_TIMEOUT_MS
            ));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let level = self.level.trim();
        if level.is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        // Bare levels are checked here; full directives are left to the filter parser
        if !level.contains('=') && !level.contains(',') {
            let lower = level.to_lowercase();
            if !LOG_LEVELS.contains(&lower.as_str()) {
                return Err(format!("Unknown log level: {}", level));
            }
        }

        Ok(())
    }
}
