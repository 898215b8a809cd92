use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Resource guarded by a power
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "power_resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub power_id: i32,

    #[sea_orm(indexed)]
    pub resource_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::power::Entity",
        from = "Column::PowerId",
        to = "super::power::Column::Id",
        on_delete = "Cascade"
    )]
    Power,

    #[sea_orm(
        belongs_to = "super::resource::Entity",
        from = "Column::ResourceId",
        to = "super::resource::Column::Id",
        on_delete = "Cascade"
    )]
    Resource,
}

impl Related<super::power::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Power.def()
    }
}

impl Related<super::resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resource.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
