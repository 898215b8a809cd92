use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Parent role in the admin tree
    pub parent_id: Option<i32>,

    #[sea_orm(unique)]
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
    #[sea_orm(has_many = "super::role_user::Entity")]
    RoleUsers,

    #[sea_orm(has_many = "super::role_user_group::Entity")]
    RoleUserGroups,

    #[sea_orm(has_many = "super::role_power::Entity")]
    RolePowers,
}

impl Related<super::role_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleUsers.def()
    }
}

impl Related<super::role_user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleUserGroups.def()
    }
}

impl Related<super::role_power::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolePowers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> crate::core::models::Role {
        use crate::core::models::{EntityState, Role, RoleId};

        Role {
            id: RoleId(self.id),
            parent_id: self.parent_id.map(RoleId),
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
