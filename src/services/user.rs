//! User administration

use super::{ProfileService, ensure_enabled, ensure_not_blank};
use crate::config::AuthConfig;
use crate::core::models::{
    EntityState, NewUser, Page, PageQuery, RoleId, StateChange, User, UserFilter, UserGroupId,
    UserId, UserProfile, UserUpdate,
};
use crate::core::stores::{GroupMembershipStore, RoleAssignmentStore};
use crate::storage::database::{Database, NewUserRecord};
use crate::utils::auth::password::check_password_strength;
use crate::utils::auth::{hash_password, verify_password};
use crate::utils::error::{RbacError, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// User accounts and their direct grants
#[derive(Debug, Clone)]
pub struct UserService {
    db: Arc<Database>,
    profiles: ProfileService,
    config: Arc<AuthConfig>,
}

impl UserService {
    pub fn new(db: Arc<Database>, profiles: ProfileService, config: AuthConfig) -> Self {
        Self {
            db,
            profiles,
            config: Arc::new(config),
        }
    }

    /// Self-service sign-up
    pub async fn register(&self, input: NewUser) -> Result<User> {
        if !self.config.allow_registration {
            return Err(RbacError::forbidden("Registration is disabled"));
        }
        ensure_not_blank(&input.username, "Username")?;
        check_password_strength(&input.password)?;

        if self.db.find_user_by_username(&input.username).await?.is_some() {
            return Err(RbacError::conflict(format!(
                "Username already exists: {}",
                input.username
            )));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .db
            .create_user(NewUserRecord {
                username: input.username,
                password_hash,
                name: input.name,
                email: input.email,
                phone: input.phone,
                avatar: input.avatar,
                external_id: None,
            })
            .await?;

        info!("User registered: {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn find_all(&self, filter: &UserFilter, query: PageQuery) -> Result<Page<User>> {
        self.db.list_users(filter, query).await
    }

    /// User with resolved permissions, the same payload login returns
    pub async fn find_one(&self, user_id: UserId) -> Result<UserProfile> {
        let user = self.get(user_id).await?;
        self.profiles.profile(user).await
    }

    pub async fn update(&self, user_id: UserId, input: UserUpdate) -> Result<User> {
        ensure_enabled(self.get(user_id).await?.state, "User")?;
        self.db.update_user_profile(user_id, &input).await
    }

    /// Change a password; only the account owner may do this
    pub async fn update_password(
        &self,
        actor: UserId,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if actor != user_id {
            warn!("User {} tried to change the password of {}", actor, user_id);
            return Err(RbacError::forbidden(
                "Cannot change another user's password",
            ));
        }

        let user = self.get(user_id).await?;
        ensure_enabled(user.state, "User")?;
        if !verify_password(old_password, &user.password_hash)? {
            return Err(RbacError::InvalidCredentials);
        }
        check_password_strength(new_password)?;

        let password_hash = hash_password(new_password)?;
        self.db.update_user_password(user_id, &password_hash).await?;

        info!("Password changed for user: {}", user_id);
        Ok(())
    }

    pub async fn set_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<()> {
        ensure_enabled(self.get(user_id).await?.state, "User")?;
        self.db.set_user_roles(user_id, role_ids).await?;
        info!("User {} now has {} direct roles", user_id, role_ids.len());
        Ok(())
    }

    pub async fn set_groups(&self, user_id: UserId, group_ids: &[UserGroupId]) -> Result<()> {
        ensure_enabled(self.get(user_id).await?.state, "User")?;
        self.db.set_user_groups(user_id, group_ids).await?;
        info!("User {} now belongs to {} groups", user_id, group_ids.len());
        Ok(())
    }

    pub async fn enable(&self, user_id: UserId) -> Result<StateChange> {
        self.switch(user_id, EntityState::Enabled).await
    }

    pub async fn disable(&self, user_id: UserId) -> Result<StateChange> {
        self.switch(user_id, EntityState::Disabled).await
    }

    /// Hard delete; role and group rows go in the same transaction
    pub async fn remove(&self, user_id: UserId) -> Result<()> {
        self.db.delete_user(user_id).await?;
        info!("User removed: {}", user_id);
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<User> {
        self.db
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| RbacError::not_found(format!("User not found: {}", user_id)))
    }

    async fn switch(&self, user_id: UserId, target: EntityState) -> Result<StateChange> {
        let user = self.get(user_id).await?;
        let change = StateChange::between(user.state, target);
        if change == StateChange::Changed {
            self.db.set_user_state(user_id, target).await?;
            info!("User {} is now {:?}", user_id, target);
        }
        Ok(change)
    }
}
