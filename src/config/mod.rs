//! Configuration management for the RBAC backend
//!
//! This module handles loading, validation, and management of all configuration.
//! The binary builds one [`Config`] at startup and passes it by reference to the
//! components that need a section of it.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{RbacError, Result};
use std::path::Path;

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Application configuration
    pub app: AppConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RbacError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let app: AppConfig = serde_yaml::from_str(content)
            .map_err(|e| RbacError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { app };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Let `RBAC_*` environment variables override this configuration
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Override every field whose key the lookup knows, then validate
    pub fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        self.app.apply_lookup(lookup)?;
        self.validate()?;
        Ok(self)
    }

    /// Get storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.app.storage
    }

    /// Get auth configuration
    pub fn auth(&self) -> &AuthConfig {
        &self.app.auth
    }

    /// Get resolver configuration
    pub fn resolver(&self) -> &ResolverConfig {
        &self.app.resolver
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.app.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.app
            .storage
            .validate()
            .map_err(|e| RbacError::Config(format!("Storage config error: {}", e)))?;

        self.app
            .auth
            .validate()
            .map_err(|e| RbacError::Config(format!("Auth config error: {}", e)))?;

        self.app
            .resolver
            .validate()
            .map_err(|e| RbacError::Config(format!("Resolver config error: {}", e)))?;

        self.app
            .logging
            .validate()
            .map_err(|e| RbacError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.app)
            .map_err(|e| RbacError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
