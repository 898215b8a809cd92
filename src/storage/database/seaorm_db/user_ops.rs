use crate::core::models::{EntityState, Page, PageQuery, User, UserFilter, UserId, UserUpdate};
use crate::utils::error::{RbacError, Result};
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, role_user, user, user_user_group};
use super::links;
use super::types::{NewUserRecord, SeaOrmDatabase};

impl SeaOrmDatabase {
    /// Find user by ID
    pub async fn find_user_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        debug!("Finding user by ID: {}", user_id);

        let user_model = entities::User::find_by_id(user_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(user_model.map(|model| model.to_domain()))
    }

    /// Find user by username
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        debug!("Finding user by username: {}", username);

        let user_model = entities::User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(user_model.map(|model| model.to_domain()))
    }

    /// Find the user bound to an external identity
    pub async fn find_user_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        debug!("Finding user by external ID");

        let user_model = entities::User::find()
            .filter(user::Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(user_model.map(|model| model.to_domain()))
    }

    /// Create a new user
    pub async fn create_user(&self, record: NewUserRecord) -> Result<User> {
        debug!("Creating user: {}", record.username);

        let now = chrono::Utc::now();
        let active_model = user::ActiveModel {
            username: Set(record.username),
            password_hash: Set(record.password_hash),
            name: Set(record.name),
            email: Set(record.email),
            phone: Set(record.phone),
            avatar: Set(record.avatar),
            external_id: Set(record.external_id),
            state: Set(EntityState::Enabled.as_flag()),
            created_by: Set(None),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.to_domain())
    }

    /// Update profile fields; `None` leaves a field untouched
    pub async fn update_user_profile(&self, user_id: UserId, update: &UserUpdate) -> Result<User> {
        debug!("Updating profile of user: {}", user_id);

        let mut active_model: user::ActiveModel = self.user_model(user_id).await?.into();
        if let Some(name) = &update.name {
            active_model.name = Set(Some(name.clone()));
        }
        if let Some(email) = &update.email {
            active_model.email = Set(Some(email.clone()));
        }
        if let Some(phone) = &update.phone {
            active_model.phone = Set(Some(phone.clone()));
        }
        if let Some(avatar) = &update.avatar {
            active_model.avatar = Set(Some(avatar.clone()));
        }
        active_model.updated_at = Set(chrono::Utc::now());

        let model = active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.to_domain())
    }

    /// Update user password
    pub async fn update_user_password(&self, user_id: UserId, password_hash: &str) -> Result<()> {
        debug!("Updating password for user: {}", user_id);

        let mut active_model: user::ActiveModel = self.user_model(user_id).await?.into();
        active_model.password_hash = Set(password_hash.to_string());
        active_model.updated_at = Set(chrono::Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(())
    }

    /// Record the external identity a user logs in with
    pub async fn bind_user_external_id(&self, user_id: UserId, external_id: &str) -> Result<()> {
        debug!("Binding external identity to user: {}", user_id);

        let mut active_model: user::ActiveModel = self.user_model(user_id).await?.into();
        active_model.external_id = Set(Some(external_id.to_string()));
        active_model.updated_at = Set(chrono::Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(())
    }

    /// Set the lifecycle state
    pub async fn set_user_state(&self, user_id: UserId, state: EntityState) -> Result<()> {
        debug!("Setting state of user {} to {:?}", user_id, state);

        let mut active_model: user::ActiveModel = self.user_model(user_id).await?.into();
        active_model.state = Set(state.as_flag());
        active_model.updated_at = Set(chrono::Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(())
    }

    /// List users, newest first
    pub async fn list_users(&self, filter: &UserFilter, query: PageQuery) -> Result<Page<User>> {
        debug!("Listing users: {:?} {:?}", filter, query);
        let query = query.normalized();

        let condition = Condition::all()
            .add_option(filter.username.as_deref().map(|v| user::Column::Username.contains(v)))
            .add_option(filter.name.as_deref().map(|v| user::Column::Name.contains(v)))
            .add_option(filter.email.as_deref().map(|v| user::Column::Email.contains(v)))
            .add_option(filter.phone.as_deref().map(|v| user::Column::Phone.contains(v)));

        let paginator = entities::User::find()
            .filter(condition)
            .order_by_desc(user::Column::Id)
            .paginate(&self.db, query.page_size);

        let total = paginator.num_items().await.map_err(RbacError::Database)?;
        let models = paginator
            .fetch_page(query.index())
            .await
            .map_err(RbacError::Database)?;

        Ok(Page::new(
            query,
            total,
            models.iter().map(user::Model::to_domain).collect(),
        ))
    }

    /// Delete a user and every role and group row referencing it
    pub async fn delete_user(&self, user_id: UserId) -> Result<()> {
        debug!("Deleting user: {}", user_id);

        let id = user_id.get();
        let txn = self.db.begin().await.map_err(RbacError::Database)?;

        links::unlink_all::<entities::RoleUser, _>(&txn, role_user::Column::UserId, id).await?;
        links::unlink_all::<entities::UserUserGroup, _>(&txn, user_user_group::Column::UserId, id)
            .await?;
        let result = entities::User::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(RbacError::Database)?;
        if result.rows_affected == 0 {
            return Err(RbacError::not_found("User not found"));
        }

        txn.commit().await.map_err(RbacError::Database)?;
        Ok(())
    }

    async fn user_model(&self, user_id: UserId) -> Result<user::Model> {
        entities::User::find_by_id(user_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?
            .ok_or_else(|| RbacError::NotFound("User not found".to_string()))
    }
}
