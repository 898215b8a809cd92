use crate::core::models::{
    EntityState, NewUserGroup, Page, PageQuery, UserGroup, UserGroupFilter, UserGroupId,
    UserGroupUpdate,
};
use crate::utils::error::{RbacError, Result};
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, role_user_group, user_group, user_user_group};
use super::links;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find user group by ID
    pub async fn find_user_group_by_id(&self, group_id: UserGroupId) -> Result<Option<UserGroup>> {
        debug!("Finding user group by ID: {}", group_id);

        let model = entities::UserGroup::find_by_id(group_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.map(|model| model.to_domain()))
    }

    /// Find user group by name
    pub async fn find_user_group_by_name(&self, name: &str) -> Result<Option<UserGroup>> {
        debug!("Finding user group by name: {}", name);

        let model = entities::UserGroup::find()
            .filter(user_group::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.map(|model| model.to_domain()))
    }

    /// Create a new user group
    pub async fn create_user_group(
        &self,
        input: &NewUserGroup,
        operator: Option<&str>,
    ) -> Result<UserGroup> {
        debug!("Creating user group: {}", input.name);

        let now = chrono::Utc::now();
        let active_model = user_group::ActiveModel {
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            state: Set(EntityState::Enabled.as_flag()),
            created_by: Set(operator.map(str::to_string)),
            created_at: Set(now),
            updated_by: Set(operator.map(str::to_string)),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.to_domain())
    }

    /// Update a user group
    pub async fn update_user_group(
        &self,
        group_id: UserGroupId,
        update: &UserGroupUpdate,
        operator: Option<&str>,
    ) -> Result<UserGroup> {
        debug!("Updating user group: {}", group_id);

        let mut active_model: user_group::ActiveModel = self.user_group_model(group_id).await?.into();
        if let Some(name) = &update.name {
            active_model.name = Set(name.clone());
        }
        if let Some(description) = &update.description {
            active_model.description = Set(Some(description.clone()));
        }
        if let Some(operator) = operator {
            active_model.updated_by = Set(Some(operator.to_string()));
        }
        active_model.updated_at = Set(chrono::Utc::now());

        let model = active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.to_domain())
    }

    /// Set the lifecycle state
    pub async fn set_user_group_state(&self, group_id: UserGroupId, state: EntityState) -> Result<()> {
        debug!("Setting state of user group {} to {:?}", group_id, state);

        let mut active_model: user_group::ActiveModel = self.user_group_model(group_id).await?.into();
        active_model.state = Set(state.as_flag());
        active_model.updated_at = Set(chrono::Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(())
    }

    /// List user groups, newest first
    pub async fn list_user_groups(
        &self,
        filter: &UserGroupFilter,
        query: PageQuery,
    ) -> Result<Page<UserGroup>> {
        debug!("Listing user groups: {:?} {:?}", filter, query);
        let query = query.normalized();

        let condition = Condition::all()
            .add_option(filter.name.as_deref().map(|v| user_group::Column::Name.contains(v)));

        let paginator = entities::UserGroup::find()
            .filter(condition)
            .order_by_desc(user_group::Column::Id)
            .paginate(&self.db, query.page_size);

        let total = paginator.num_items().await.map_err(RbacError::Database)?;
        let models = paginator
            .fetch_page(query.index())
            .await
            .map_err(RbacError::Database)?;

        Ok(Page::new(
            query,
            total,
            models.iter().map(user_group::Model::to_domain).collect(),
        ))
    }

    /// Delete a user group with its membership and role rows
    pub async fn delete_user_group(&self, group_id: UserGroupId) -> Result<()> {
        debug!("Deleting user group: {}", group_id);

        let id = group_id.get();
        let txn = self.db.begin().await.map_err(RbacError::Database)?;

        links::unlink_all::<entities::UserUserGroup, _>(
            &txn,
            user_user_group::Column::UserGroupId,
            id,
        )
        .await?;
        links::unlink_all::<entities::RoleUserGroup, _>(
            &txn,
            role_user_group::Column::UserGroupId,
            id,
        )
        .await?;

        let result = entities::UserGroup::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(RbacError::Database)?;
        if result.rows_affected == 0 {
            return Err(RbacError::not_found("User group not found"));
        }

        txn.commit().await.map_err(RbacError::Database)?;
        Ok(())
    }

    async fn user_group_model(&self, group_id: UserGroupId) -> Result<user_group::Model> {
        entities::UserGroup::find_by_id(group_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?
            .ok_or_else(|| RbacError::NotFound("User group not found".to_string()))
    }
}
