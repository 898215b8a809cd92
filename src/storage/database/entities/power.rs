use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Power database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "powers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Key of the protected resource
    pub resource_key: String,

    /// One of manage, create, view, update, delete
    pub action: String,

    pub name: String,

    pub description: Option<String>,

    pub state: i16,

    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_by: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_power::Entity")]
    RolePowers,

    #[sea_orm(has_many = "super::power_resource::Entity")]
    PowerResources,
}

impl Related<super::role_power::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolePowers.def()
    }
}

impl Related<super::power_resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PowerResources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain power; an unrecognised action is a storage fault
    pub fn to_domain(&self) -> crate::utils::error::Result<crate::core::models::Power> {
        use crate::core::models::{EntityState, Power, PowerAction, PowerId};
        use crate::utils::error::RbacError;

        let action: PowerAction = self.action.parse().map_err(|e: String| {
            RbacError::Internal(format!("Power {} has a corrupt action: {}", self.id, e))
        })?;

        Ok(Power {
            id: PowerId(self.id),
            resource_key: self.resource_key.clone(),
            action,
            name: self.name.clone(),
            description: self.description.clone(),
            state: EntityState::from_flag(self.state),
            audit: super::audit_from_columns(
                &self.created_by,
                self.created_at,
                &self.updated_by,
                self.updated_at,
            ),
        })
    }
}
