//! Storage layer for the RBAC backend
//!
//! Entities and the five relation tables live in a relational database. An
//! in-memory store implements the same lookup traits for tests and tooling.

/// Database storage module
pub mod database;
/// In-memory store
pub mod memory;

use crate::config::StorageConfig;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use memory::MemoryStore;

/// Main storage layer
#[derive(Debug, Clone)]
pub struct StorageLayer {
    /// Database connection pool
    pub database: Arc<database::Database>,
}

impl StorageLayer {
    /// Create a new storage layer
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("Initializing storage layer");

        debug!("Connecting to database");
        let database = Arc::new(database::Database::new(&config.database).await?);

        info!("Storage layer initialized successfully");
        Ok(Self { database })
    }

    /// Wrap an already opened database
    pub fn from_database(database: database::Database) -> Self {
        Self {
            database: Arc::new(database),
        }
    }

    /// Create missing tables and indexes
    pub async fn init_schema(&self) -> Result<()> {
        self.database.ensure_schema().await
    }

    /// Health check for the storage backends
    pub async fn health_check(&self) -> StorageHealthStatus {
        let database = match self.database.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        };

        StorageHealthStatus {
            database,
            overall: database,
        }
    }

    /// Get database
    pub fn db(&self) -> &database::Database {
        &self.database
    }

    /// Shared handle to the database
    pub fn database(&self) -> Arc<database::Database> {
        Arc::clone(&self.database)
    }
}

/// Storage health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageHealthStatus {
    /// Database health
    pub database: bool,
    /// Overall health
    pub overall: bool,
}
