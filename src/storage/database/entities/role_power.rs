use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Power granted to a role
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "role_powers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub role_id: i32,

    #[sea_orm(indexed)]
    pub power_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id",
        on_delete = "Cascade"
    )]
    Role,

    #[sea_orm(
        belongs_to = "super::power::Entity",
        from = "Column::PowerId",
        to = "super::power::Column::Id",
        on_delete = "Cascade"
    )]
    Power,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::power::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Power.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
