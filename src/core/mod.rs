//! Core functionality for the RBAC backend
//!
//! Domain models, the lookup stores and the permission resolver, plus the
//! [`AdminSystem`] that wires them to a storage backend.

pub mod models;
pub mod resolver;
pub mod stores;

use crate::auth::AuthSystem;
use crate::config::Config;
use crate::services::{
    PowerService, ProfileService, ResourceService, RoleService, UserGroupService, UserService,
};
use crate::storage::StorageLayer;
use crate::utils::error::Result;
use resolver::PermissionResolver;
use std::sync::Arc;
use tracing::{debug, info};

/// Every service over one shared storage layer
#[derive(Debug, Clone)]
pub struct AdminSystem {
    /// Configuration
    config: Arc<Config>,
    /// Storage layer
    storage: StorageLayer,
    /// Shared resolver
    resolver: Arc<PermissionResolver>,
    /// Authentication system
    auth: AuthSystem,
    users: UserService,
    roles: RoleService,
    groups: UserGroupService,
    powers: PowerService,
    resources: ResourceService,
}

impl AdminSystem {
    /// Connect to storage and build every service
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating admin system instance");

        let storage = StorageLayer::new(config.storage()).await?;
        Ok(Self::with_storage(config, storage))
    }

    /// Build every service over an existing storage layer
    pub fn with_storage(config: Config, storage: StorageLayer) -> Self {
        let db = storage.database();
        let resolver = Arc::new(PermissionResolver::from_store(
            db.clone(),
            config.resolver().clone(),
        ));
        let profiles = ProfileService::new(resolver.clone(), db.clone());
        debug!("Resolver configured: {:?}", resolver.config());

        let auth = AuthSystem::new(config.auth(), db.clone(), profiles.clone());
        let users = UserService::new(db.clone(), profiles, config.auth().clone());

        Self {
            roles: RoleService::new(db.clone()),
            groups: UserGroupService::new(db.clone()),
            powers: PowerService::new(db.clone()),
            resources: ResourceService::new(db),
            config: Arc::new(config),
            storage,
            resolver,
            auth,
            users,
        }
    }

    /// Create missing tables
    pub async fn init_schema(&self) -> Result<()> {
        self.storage.init_schema().await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &StorageLayer {
        &self.storage
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    pub fn auth(&self) -> &AuthSystem {
        &self.auth
    }

    /// Replace the authentication system, e.g. to attach an identity provider
    pub fn set_auth(&mut self, auth: AuthSystem) {
        self.auth = auth;
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn roles(&self) -> &RoleService {
        &self.roles
    }

    pub fn groups(&self) -> &UserGroupService {
        &self.groups
    }

    pub fn powers(&self) -> &PowerService {
        &self.powers
    }

    pub fn resources(&self) -> &ResourceService {
        &self.resources
    }
}
