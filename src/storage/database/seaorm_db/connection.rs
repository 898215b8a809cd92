use crate::config::DatabaseConfig;
use crate::utils::error::{RbacError, Result};
use sea_orm::*;
use std::time::Duration;
use tracing::{debug, info};

use super::super::entities;
use super::types::{DatabaseBackendType, SeaOrmDatabase};

impl SeaOrmDatabase {
    /// Open a connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let backend_type = if config.is_sqlite() {
            DatabaseBackendType::SQLite
        } else {
            DatabaseBackendType::PostgreSQL
        };

        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .sqlx_logging(config.sqlx_logging)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let db = Database::connect(opt).await.map_err(RbacError::Database)?;

        info!("Database connection established ({:?})", backend_type);
        Ok(Self { db, backend_type })
    }

    /// Wrap an existing connection
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let backend_type = match db.get_database_backend() {
            DbBackend::Postgres => DatabaseBackendType::PostgreSQL,
            _ => DatabaseBackendType::SQLite,
        };
        Self { db, backend_type }
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Create every table and index that does not exist yet
    ///
    /// Entity tables are created before the join tables that reference them.
    pub async fn ensure_schema(&self) -> Result<()> {
        info!("Ensuring database schema");

        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut tables = vec![
            schema.create_table_from_entity(entities::User),
            schema.create_table_from_entity(entities::Role),
            schema.create_table_from_entity(entities::UserGroup),
            schema.create_table_from_entity(entities::Power),
            schema.create_table_from_entity(entities::Resource),
            schema.create_table_from_entity(entities::RoleUser),
            schema.create_table_from_entity(entities::RoleUserGroup),
            schema.create_table_from_entity(entities::UserUserGroup),
            schema.create_table_from_entity(entities::RolePower),
            schema.create_table_from_entity(entities::PowerResource),
        ];
        for table in tables.iter_mut() {
            table.if_not_exists();
            self.db
                .execute(backend.build(&*table))
                .await
                .map_err(RbacError::Database)?;
        }

        let indexes = [
            schema.create_index_from_entity(entities::RoleUser),
            schema.create_index_from_entity(entities::RoleUserGroup),
            schema.create_index_from_entity(entities::UserUserGroup),
            schema.create_index_from_entity(entities::RolePower),
            schema.create_index_from_entity(entities::PowerResource),
        ];
        for mut index in indexes.into_iter().flatten() {
            index.if_not_exists();
            self.db
                .execute(backend.build(&index))
                .await
                .map_err(RbacError::Database)?;
        }

        info!("Database schema ready");
        Ok(())
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing database health check");

        let _result = entities::User::find()
            .limit(1)
            .all(&self.db)
            .await
            .map_err(RbacError::Database)?;

        debug!("Database health check passed");
        Ok(())
    }
}
