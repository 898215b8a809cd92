use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User ID
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Username (unique)
    #[sea_orm(unique)]
    pub username: String,

    /// Password hash
    pub password_hash: String,

    /// Display name
    pub name: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Avatar URL
    pub avatar: Option<String>,

    /// External identity binding (unique when set)
    #[sea_orm(unique)]
    pub external_id: Option<String>,

    /// 1 enabled, 0 disabled
    pub state: i16,

    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_by: Option<String>,
    pub updated_at: DateTimeUtc,
}

/// User entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Direct role assignments
    #[sea_orm(has_many = "super::role_user::Entity")]
    RoleUsers,

    /// Group memberships
    #[sea_orm(has_many = "super::user_user_group::Entity")]
    UserUserGroups,
}

impl Related<super::role_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleUsers.def()
    }
}

impl Related<super::user_user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserUserGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert SeaORM model to domain user model
    pub fn to_domain(&self) -> crate::core::models::User {
        use crate::core::models::{EntityState, User, UserId};

        User {
            id: UserId(self.id),
            username: self.username.clone(),
            password_hash: self.password_hash.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            avatar: self.avatar.clone(),
            external_id: self.external_id.clone(),
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
