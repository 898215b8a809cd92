use crate::core::models::{
    EntityState, NewResource, Page, PageQuery, Resource, ResourceFilter, ResourceId,
    ResourceUpdate,
};
use crate::utils::error::{RbacError, Result};
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, power_resource, resource};
use super::links;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find resource by ID
    pub async fn find_resource_by_id(&self, resource_id: ResourceId) -> Result<Option<Resource>> {
        debug!("Finding resource by ID: {}", resource_id);

        let model = entities::Resource::find_by_id(resource_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.map(|model| model.to_domain()))
    }

    /// Find resource by key
    pub async fn find_resource_by_key(&self, key: &str) -> Result<Option<Resource>> {
        debug!("Finding resource by key: {}", key);

        let model = entities::Resource::find()
            .filter(resource::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(model.map(|model| model.to_domain()))
    }

    /// Create a new resource
    pub async fn create_resource(
        &self,
        input: &NewResource,
        operator: Option<&str>,
    ) -> Result<Resource> {
        debug!("Creating resource: {}", input.key);

        let now = chrono::Utc::now();
        let active_model = resource::ActiveModel {
            key: Set(input.key.clone()),
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

    /// Update a resource
    pub async fn update_resource(
        &self,
        resource_id: ResourceId,
        update: &ResourceUpdate,
        operator: Option<&str>,
    ) -> Result<Resource> {
        debug!("Updating resource: {}", resource_id);

        let mut active_model: resource::ActiveModel = self.resource_model(resource_id).await?.into();
        if let Some(key) = &update.key {
            active_model.key = Set(key.clone());
        }
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
    pub async fn set_resource_state(&self, resource_id: ResourceId, state: EntityState) -> Result<()> {
        debug!("Setting state of resource {} to {:?}", resource_id, state);

        let mut active_model: resource::ActiveModel = self.resource_model(resource_id).await?.into();
        active_model.state = Set(state.as_flag());
        active_model.updated_at = Set(chrono::Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(())
    }

    /// List resources, newest first
    pub async fn list_resources(
        &self,
        filter: &ResourceFilter,
        query: PageQuery,
    ) -> Result<Page<Resource>> {
        debug!("Listing resources: {:?} {:?}", filter, query);
        let query = query.normalized();

        let condition = Condition::all()
            .add_option(filter.key.as_deref().map(|v| resource::Column::Key.contains(v)))
            .add_option(filter.name.as_deref().map(|v| resource::Column::Name.contains(v)));

        let paginator = entities::Resource::find()
            .filter(condition)
            .order_by_desc(resource::Column::Id)
            .paginate(&self.db, query.page_size);

        let total = paginator.num_items().await.map_err(RbacError::Database)?;
        let models = paginator
            .fetch_page(query.index())
            .await
            .map_err(RbacError::Database)?;

        Ok(Page::new(
            query,
            total,
            models.iter().map(resource::Model::to_domain).collect(),
        ))
    }

    /// Delete a resource with its power rows
    pub async fn delete_resource(&self, resource_id: ResourceId) -> Result<()> {
        debug!("Deleting resource: {}", resource_id);

        let id = resource_id.get();
        let txn = self.db.begin().await.map_err(RbacError::Database)?;

        links::unlink_all::<entities::PowerResource, _>(
            &txn,
            power_resource::Column::ResourceId,
            id,
        )
        .await?;

        let result = entities::Resource::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(RbacError::Database)?;
        if result.rows_affected == 0 {
            return Err(RbacError::not_found("Resource not found"));
        }

        txn.commit().await.map_err(RbacError::Database)?;
        Ok(())
    }

    async fn resource_model(&self, resource_id: ResourceId) -> Result<resource::Model> {
        entities::Resource::find_by_id(resource_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?
            .ok_or_else(|| RbacError::NotFound("Resource not found".to_string()))
    }
}
