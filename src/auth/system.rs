//! Core authentication system implementation

use super::credential::CredentialLookup;
use crate::config::AuthConfig;
use crate::core::models::{User, UserProfile};
use crate::services::ProfileService;
use crate::storage::database::Database;
use crate::utils::auth::verify_password;
use crate::utils::error::{RbacError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main authentication system
#[derive(Clone)]
pub struct AuthSystem {
    /// Authentication configuration
    config: Arc<AuthConfig>,
    /// User rows
    db: Arc<Database>,
    /// Permission payload builder
    profiles: ProfileService,
    /// External identity provider, when one is wired in
    credentials: Option<Arc<dyn CredentialLookup>>,
}

impl std::fmt::Debug for AuthSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSystem")
            .field("config", &self.config)
            .field("external_provider", &self.credentials.is_some())
            .finish()
    }
}

impl AuthSystem {
    /// Create a new authentication system
    pub fn new(config: &AuthConfig, db: Arc<Database>, profiles: ProfileService) -> Self {
        info!("Initializing authentication system");
        Self {
            config: Arc::new(config.clone()),
            db,
            profiles,
            credentials: None,
        }
    }

    /// Attach the external identity provider
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialLookup>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Username and password login
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile> {
        debug!("Login attempt: {}", username);

        let user = self
            .db
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| RbacError::not_found(format!("User not found: {}", username)))?;
        ensure_can_log_in(&user)?;

        if !verify_password(password, &user.password_hash)? {
            warn!("Wrong password for user: {}", username);
            return Err(RbacError::InvalidCredentials);
        }

        self.finish_login(user).await
    }

    /// Bind an external identity to an existing account and log it in
    pub async fn bind_external(&self, username: &str, code: &str) -> Result<UserProfile> {
        let credentials = self.external_provider()?;

        let user = self
            .db
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| RbacError::not_found(format!("User not found: {}", username)))?;
        ensure_can_log_in(&user)?;
        if user.external_id.is_some() {
            return Err(RbacError::conflict(format!(
                "User {} is already bound to an external identity",
                username
            )));
        }

        let identity = credentials.exchange(code).await?;
        if let Some(bound) = self.db.find_user_by_external_id(&identity.external_id).await? {
            return Err(RbacError::conflict(format!(
                "External identity is already bound to user {}",
                bound.username
            )));
        }

        self.db
            .bind_user_external_id(user.id, &identity.external_id)
            .await?;
        info!("External identity bound to user: {}", username);

        let user = User {
            external_id: Some(identity.external_id),
            ..user
        };
        self.finish_login(user).await
    }

    /// Log in with a provider code for an already bound identity
    pub async fn login_external(&self, code: &str) -> Result<UserProfile> {
        let credentials = self.external_provider()?;

        let identity = credentials.exchange(code).await?;
        let user = self
            .db
            .find_user_by_external_id(&identity.external_id)
            .await?
            .ok_or_else(|| RbacError::not_found("No user is bound to this external identity"))?;
        ensure_can_log_in(&user)?;

        self.finish_login(user).await
    }

    /// Get authentication configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    async fn finish_login(&self, user: User) -> Result<UserProfile> {
        let profile = self.profiles.profile(user).await?;
        info!(
            "User logged in: {} ({} powers)",
            profile.user.username,
            profile.powers.len()
        );
        Ok(profile)
    }

    fn external_provider(&self) -> Result<&dyn CredentialLookup> {
        if !self.config.external_login_enabled {
            return Err(RbacError::forbidden("External login is disabled"));
        }
        self.credentials
            .as_deref()
            .ok_or_else(|| RbacError::config("No external identity provider configured"))
    }
}

fn ensure_can_log_in(user: &User) -> Result<()> {
    if !user.is_enabled() {
        warn!("Login refused for disabled user: {}", user.username);
        return Err(RbacError::disabled(format!(
            "User is disabled: {}",
            user.username
        )));
    }
    Ok(())
}
