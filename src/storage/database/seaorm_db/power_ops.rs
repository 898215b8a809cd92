use crate::core::models::{EntityState, NewPower, Page, PageQuery, Power, PowerFilter, PowerId, PowerUpdate};
use crate::utils::error::{RbacError, Result};
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, power, power_resource, role_power};
use super::links;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find power by ID
    pub async fn find_power_by_id(&self, power_id: PowerId) -> Result<Option<Power>> {
        debug!("Finding power by ID: {}", power_id);

        let model = entities::Power::find_by_id(power_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?;

        model.map(|model| model.to_domain()).transpose()
    }

    /// Create a new power
    pub async fn create_power(&self, input: &NewPower, operator: Option<&str>) -> Result<Power> {
        debug!("Creating power: {} {}", input.action, input.resource_key);

        let now = chrono::Utc::now();
        let active_model = power::ActiveModel {
            resource_key: Set(input.resource_key.clone()),
            action: Set(input.action.as_str().to_string()),
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

        model.to_domain()
    }

    /// Update a power
    pub async fn update_power(
        &self,
        power_id: PowerId,
        update: &PowerUpdate,
        operator: Option<&str>,
    ) -> Result<Power> {
        debug!("Updating power: {}", power_id);

        let mut active_model: power::ActiveModel = self.power_model(power_id).await?.into();
        if let Some(resource_key) = &update.resource_key {
            active_model.resource_key = Set(resource_key.clone());
        }
        if let Some(action) = update.action {
            active_model.action = Set(action.as_str().to_string());
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

        model.to_domain()
    }

    /// Set the lifecycle state
    pub async fn set_power_state(&self, power_id: PowerId, state: EntityState) -> Result<()> {
        debug!("Setting state of power {} to {:?}", power_id, state);

        let mut active_model: power::ActiveModel = self.power_model(power_id).await?.into();
        active_model.state = Set(state.as_flag());
        active_model.updated_at = Set(chrono::Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(())
    }

    /// List powers, newest first
    pub async fn list_powers(&self, filter: &PowerFilter, query: PageQuery) -> Result<Page<Power>> {
        debug!("Listing powers: {:?} {:?}", filter, query);
        let query = query.normalized();

        let condition = Condition::all()
            .add_option(filter.name.as_deref().map(|v| power::Column::Name.contains(v)))
            .add_option(
                filter
                    .resource_key
                    .as_deref()
                    .map(|v| power::Column::ResourceKey.contains(v)),
            )
            .add_option(filter.action.map(|v| power::Column::Action.eq(v.as_str())));

        let paginator = entities::Power::find()
            .filter(condition)
            .order_by_desc(power::Column::Id)
            .paginate(&self.db, query.page_size);

        let total = paginator.num_items().await.map_err(RbacError::Database)?;
        let models = paginator
            .fetch_page(query.index())
            .await
            .map_err(RbacError::Database)?;

        let data = models
            .iter()
            .map(power::Model::to_domain)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(query, total, data))
    }

    /// Delete a power with its role and resource rows
    pub async fn delete_power(&self, power_id: PowerId) -> Result<()> {
        debug!("Deleting power: {}", power_id);

        let id = power_id.get();
        let txn = self.db.begin().await.map_err(RbacError::Database)?;

        links::unlink_all::<entities::RolePower, _>(&txn, role_power::Column::PowerId, id).await?;
        links::unlink_all::<entities::PowerResource, _>(&txn, power_resource::Column::PowerId, id)
            .await?;

        let result = entities::Power::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(RbacError::Database)?;
        if result.rows_affected == 0 {
            return Err(RbacError::not_found("Power not found"));
        }

        txn.commit().await.map_err(RbacError::Database)?;
        Ok(())
    }

    async fn power_model(&self, power_id: PowerId) -> Result<power::Model> {
        entities::Power::find_by_id(power_id.get())
            .one(&self.db)
            .await
            .map_err(RbacError::Database)?
            .ok_or_else(|| RbacError::NotFound("Power not found".to_string()))
    }
}
