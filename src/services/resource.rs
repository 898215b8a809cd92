//! Resource administration

use super::{ensure_enabled, ensure_not_blank};
use crate::core::models::{
    EntityState, NewResource, Page, PageQuery, PowerId, Resource, ResourceDetail, ResourceFilter,
    ResourceId, ResourceUpdate, StateChange,
};
use crate::core::stores::PowerResourceStore;
use crate::storage::database::Database;
use crate::utils::error::{RbacError, Result};
use std::sync::Arc;
use tracing::info;

/// Resource CRUD and the powers attached to a resource
#[derive(Debug, Clone)]
pub struct ResourceService {
    db: Arc<Database>,
}

impl ResourceService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewResource, operator: Option<&str>) -> Result<Resource> {
        ensure_not_blank(&input.key, "Resource key")?;
        ensure_not_blank(&input.name, "Resource name")?;
        if self.db.find_resource_by_key(&input.key).await?.is_some() {
            return Err(RbacError::conflict(format!(
                "Resource key already exists: {}",
                input.key
            )));
        }

        let resource = self.db.create_resource(&input, operator).await?;
        info!("Resource created: {} ({})", resource.key, resource.id);
        Ok(resource)
    }

    pub async fn find_all(
        &self,
        filter: &ResourceFilter,
        query: PageQuery,
    ) -> Result<Page<Resource>> {
        self.db.list_resources(filter, query).await
    }

    /// Resource with the ids of its powers
    pub async fn find_one(&self, resource_id: ResourceId) -> Result<ResourceDetail> {
        let resource = self.get(resource_id).await?;
        ensure_enabled(resource.state, "Resource")?;

        let power_ids = self.db.powers_for_resource(resource_id).await?;
        Ok(ResourceDetail {
            resource,
            power_ids,
        })
    }

    pub async fn update(
        &self,
        resource_id: ResourceId,
        input: ResourceUpdate,
        operator: Option<&str>,
    ) -> Result<Resource> {
        let resource = self.get(resource_id).await?;
        ensure_enabled(resource.state, "Resource")?;

        if let Some(key) = &input.key {
            ensure_not_blank(key, "Resource key")?;
            if let Some(existing) = self.db.find_resource_by_key(key).await? {
                if existing.id != resource_id {
                    return Err(RbacError::conflict(format!(
                        "Resource key already exists: {}",
                        key
                    )));
                }
            }
        }

        self.db.update_resource(resource_id, &input, operator).await
    }

    pub async fn enable(&self, resource_id: ResourceId) -> Result<StateChange> {
        self.switch(resource_id, EntityState::Enabled).await
    }

    pub async fn disable(&self, resource_id: ResourceId) -> Result<StateChange> {
        self.switch(resource_id, EntityState::Disabled).await
    }

    pub async fn delete(&self, resource_id: ResourceId) -> Result<()> {
        self.db.delete_resource(resource_id).await?;
        info!("Resource deleted: {}", resource_id);
        Ok(())
    }

    pub async fn set_powers(&self, resource_id: ResourceId, power_ids: &[PowerId]) -> Result<()> {
        ensure_enabled(self.get(resource_id).await?.state, "Resource")?;
        self.db.set_resource_powers(resource_id, power_ids).await?;
        info!("Resource {} now has {} powers", resource_id, power_ids.len());
        Ok(())
    }

    async fn get(&self, resource_id: ResourceId) -> Result<Resource> {
        self.db
            .find_resource_by_id(resource_id)
            .await?
            .ok_or_else(|| RbacError::not_found(format!("Resource not found: {}", resource_id)))
    }

    async fn switch(&self, resource_id: ResourceId, target: EntityState) -> Result<StateChange> {
        let resource = self.get(resource_id).await?;
        let change = StateChange::between(resource.state, target);
        if change == StateChange::Changed {
            self.db.set_resource_state(resource_id, target).await?;
            info!("Resource {} is now {:?}", resource_id, target);
        }
        Ok(change)
    }
}
