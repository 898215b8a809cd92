use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User group database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

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
    #[sea_orm(has_many = "super::user_user_group::Entity")]
    UserUserGroups,

    #[sea_orm(has_many = "super::role_user_group::Entity")]
    RoleUserGroups,
}

impl Related<super::user_user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserUserGroups.def()
    }
}

impl Related<super::role_user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleUserGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> crate::core::models::UserGroup {
        use crate::core::models::{EntityState, UserGroup, UserGroupId};

        UserGroup {
            id: UserGroupId(self.id),
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
