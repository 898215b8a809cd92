use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Resource database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Resource key (unique)
    #[sea_orm(unique)]
    pub key: String,

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
    #[sea_orm(has_many = "super::power_resource::Entity")]
    PowerResources,
}

impl Related<super::power_resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PowerResources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> crate::core::models::Resource {
        use crate::core::models::{EntityState, Resource, ResourceId};

        Resource {
            id: ResourceId(self.id),
            key: self.key.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            state: EntityState::from_flag(self.state),
            audit: super::audit_from_columns(
                &self.created_by,
                self.created_at,
                &self.updated_by,
                self.updated_at,
            ),
        }
    }
}
