//! Power administration

use super::{ensure_enabled, ensure_not_blank};
use crate::core::models::{
    EntityState, NewPower, Page, PageQuery, Power, PowerFilter, PowerId, PowerUpdate, ResourceId,
    RoleId, StateChange,
};
use crate::core::stores::{PowerResourceStore, RolePowerStore};
use crate::storage::database::Database;
use crate::utils::error::{RbacError, Result};
use std::sync::Arc;
use tracing::info;

/// Power CRUD and the roles and resources a power is bound to
#[derive(Debug, Clone)]
pub struct PowerService {
    db: Arc<Database>,
}

impl PowerService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewPower, operator: Option<&str>) -> Result<Power> {
        ensure_not_blank(&input.resource_key, "Resource key")?;
        ensure_not_blank(&input.name, "Power name")?;

        let power = self.db.create_power(&input, operator).await?;
        info!(
            "Power created: {} {} ({})",
            power.action, power.resource_key, power.id
        );
        Ok(power)
    }

    pub async fn find_all(&self, filter: &PowerFilter, query: PageQuery) -> Result<Page<Power>> {
        self.db.list_powers(filter, query).await
    }

    pub async fn find_one(&self, power_id: PowerId) -> Result<Power> {
        let power = self.get(power_id).await?;
        ensure_enabled(power.state, "Power")?;
        Ok(power)
    }

    pub async fn update(
        &self,
        power_id: PowerId,
        input: PowerUpdate,
        operator: Option<&str>,
    ) -> Result<Power> {
        let power = self.get(power_id).await?;
        ensure_enabled(power.state, "Power")?;

        if let Some(key) = &input.resource_key {
            ensure_not_blank(key, "Resource key")?;
        }
        if let Some(name) = &input.name {
            ensure_not_blank(name, "Power name")?;
        }

        self.db.update_power(power_id, &input, operator).await
    }

    pub async fn enable(&self, power_id: PowerId) -> Result<StateChange> {
        self.switch(power_id, EntityState::Enabled).await
    }

    pub async fn disable(&self, power_id: PowerId) -> Result<StateChange> {
        self.switch(power_id, EntityState::Disabled).await
    }

    pub async fn delete(&self, power_id: PowerId) -> Result<()> {
        self.db.delete_power(power_id).await?;
        info!("Power deleted: {}", power_id);
        Ok(())
    }

    pub async fn set_roles(&self, power_id: PowerId, role_ids: &[RoleId]) -> Result<()> {
        ensure_enabled(self.get(power_id).await?.state, "Power")?;
        self.db.set_power_roles(power_id, role_ids).await?;
        info!("Power {} granted to {} roles", power_id, role_ids.len());
        Ok(())
    }

    pub async fn set_resources(&self, power_id: PowerId, resource_ids: &[ResourceId]) -> Result<()> {
        ensure_enabled(self.get(power_id).await?.state, "Power")?;
        self.db.set_power_resources(power_id, resource_ids).await?;
        info!("Power {} bound to {} resources", power_id, resource_ids.len());
        Ok(())
    }

    async fn get(&self, power_id: PowerId) -> Result<Power> {
        self.db
            .find_power_by_id(power_id)
            .await?
            .ok_or_else(|| RbacError::not_found(format!("Power not found: {}", power_id)))
    }

    async fn switch(&self, power_id: PowerId, target: EntityState) -> Result<StateChange> {
        let power = self.get(power_id).await?;
        let change = StateChange::between(power.state, target);
        if change == StateChange::Changed {
            self.db.set_power_state(power_id, target).await?;
            info!("Power {} is now {:?}", power_id, target);
        }
        Ok(change)
    }
}
