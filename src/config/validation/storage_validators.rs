//! Storage configuration validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        self.database.validate()
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if !self.url.starts_with("sqlite:")
            && !self.url.starts_with("postgresql://")
            && !self.url.starts_with("postgres://")
        {
            return Err("Only SQLite and PostgreSQL databases are supported".to_string());
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.max_connections > 1000 {
            return Err("Database max connections should not exceed 1000".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Database connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
