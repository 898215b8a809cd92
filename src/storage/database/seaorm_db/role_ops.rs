use crate::core::models::{EntityState, NewRole, Page, PageQuery, Role, RoleFilter, RoleId, RoleUpdate};
use crate::utils::error::{RbacError, Result};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, role, role_power, role_user, role_user_group};
use super::links;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find role by ID
    pub async fn find_role_by_id(&self, role_id: RoleId) -> Result<Option<Role>> {
        debug!("Finding role by ID: {}", role_id);

        let model = entities::Role::find_by_id(role_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.map(|model| model.to_domain()))
    }

    /// Find role by name
    pub async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        debug!("Finding role by name: {}", name);

        let model = entities::Role::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.map(|model| model.to_domain()))
    }

    /// Create a new role
    pub async fn create_role(&self, input: &NewRole, operator: Option<&str>) -> Result<Role> {
        debug!("Creating role: {}", input.name);

        let now = chrono::Utc::now();
        let active_model = role::ActiveModel {
            parent_id: Set(input.parent_id.map(RoleId::get)),
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

    /// Update a role
    pub async fn update_role(
        &self,
        role_id: RoleId,
        update: &RoleUpdate,
        operator: Option<&str>,
    ) -> Result<Role> {
        debug!("Updating role: {}", role_id);

        let mut active_model: role::ActiveModel = self.role_model(role_id).await?.into();
        if let Some(name) = &update.name {
            active_model.name = Set(name.clone());
        }
        if let Some(parent_id) = update.parent_id {
            active_model.parent_id = Set(Some(parent_id.get()));
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
    pub async fn set_role_state(&self, role_id: RoleId, state: EntityState) -> Result<()> {
        debug!("Setting state of role {} to {:?}", role_id, state);

        let mut active_model: role::ActiveModel = self.role_model(role_id).await?.into();
        active_model.state = Set(state.as_flag());
        active_model.updated_at = Set(chrono::Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(())
    }

    /// List roles, newest first
    pub async fn list_roles(&self, filter: &RoleFilter, query: PageQuery) -> Result<Page<Role>> {
        debug!("Listing roles: {:?} {:?}", filter, query);
        let query = query.normalized();

        let condition = Condition::all()
            .add_option(filter.name.as_deref().map(|v| role::Column::Name.contains(v)))
            .add_option(filter.parent_id.map(|v| role::Column::ParentId.eq(v.get())));

        let paginator = entities::Role::find()
            .filter(condition)
            .order_by_desc(role::Column::Id)
            .paginate(&self.db, query.page_size);

        let total = paginator.num_items().await.map_err(RbacError::Database)?;
        let models = paginator
            .fetch_page(query.index())
            .await
            .map_err(RbacError::Database)?;

        Ok(Page::new(
            query,
            total,
            models.iter().map(role::Model::to_domain).collect(),
        ))
    }

    /// Delete a role, its grant rows, and detach its child roles
    pub async fn delete_role(&self, role_id: RoleId) -> Result<()> {
        debug!("Deleting role: {}", role_id);

        let id = role_id.get();
        let txn = self.db.begin().await.map_err(RbacError::Database)?;

        links::unlink_all::<entities::RoleUser, _>(&txn, role_user::Column::RoleId, id).await?;
        links::unlink_all::<entities::RoleUserGroup, _>(&txn, role_user_group::Column::RoleId, id)
            .await?;
        links::unlink_all::<entities::RolePower, _>(&txn, role_power::Column::RoleId, id).await?;

        entities::Role::update_many()
            .col_expr(role::Column::ParentId, Expr::value(Option::<i32>::None))
            .filter(role::Column::ParentId.eq(id))
            .exec(&txn)
            .await
            .map_err(RbacError::Database)?;

        let result = entities::Role::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(RbacError::Database)?;
        if result.rows_affected == 0 {
            return Err(RbacError::not_found("Role not found"));
        }

        txn.commit().await.map_err(RbacError::Database)?;
        Ok(())
    }

    async fn role_model(&self, role_id: RoleId) -> Result<role::Model> {
        entities::Role::find_by_id(role_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?
            .ok_or_else(|| RbacError::NotFound("Role not found".to_string()))
    }
}
