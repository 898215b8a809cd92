//! Test database utilities
//!
//! Provides in-memory SQLite database for testing without external dependencies.
//! Each test gets an isolated database instance using SeaORM.

use rbac_admin::AdminSystem;
use rbac_admin::config::{Config, DatabaseConfig, ResolverConfig};
use rbac_admin::core::resolver::PermissionResolver;
use rbac_admin::storage::StorageLayer;
use rbac_admin::storage::database::Database;
use std::sync::Arc;

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<Database>,
}

impl TestDatabase {
    /// Create a new in-memory test database with the schema in place
    ///
    /// Each call creates a completely isolated database instance.
    pub async fn new() -> Self {
        let db = Database::new(&test_db_config())
            .await
            .expect("Failed to create in-memory test database");

        db.ensure_schema()
            .await
            .expect("Failed to create database schema");

        Self {
            inner: Arc::new(db),
        }
    }

    /// Get reference to the underlying database
    pub fn db(&self) -> &Database {
        &self.inner
    }

    /// Get Arc to the underlying database
    pub fn db_arc(&self) -> Arc<Database> {
        Arc::clone(&self.inner)
    }

    /// Resolver reading from this database
    pub fn resolver(&self) -> PermissionResolver {
        PermissionResolver::from_store(self.db_arc(), ResolverConfig::default())
    }

    /// Full admin system over this database
    pub fn admin(&self) -> AdminSystem {
        self.admin_with(Config::default())
    }

    /// Full admin system over this database with custom settings
    pub fn admin_with(&self, config: Config) -> AdminSystem {
        let storage = StorageLayer::from_database(self.db().clone());
        AdminSystem::with_storage(config, storage)
    }
}

/// Helper to create a simple test database config
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig::in_memory()
}
