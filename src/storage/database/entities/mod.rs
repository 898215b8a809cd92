/// Power entity module
pub mod power;
/// Power/resource join entity module
pub mod power_resource;
/// Resource entity module
pub mod resource;
/// Role entity module
pub mod role;
/// Role/power join entity module
pub mod role_power;
/// Role/user join entity module
pub mod role_user;
/// Role/user-group join entity module
pub mod role_user_group;
/// User entity module
pub mod user;
/// User group entity module
pub mod user_group;
/// User/user-group join entity module
pub mod user_user_group;

pub use power::Entity as Power;
pub use power_resource::Entity as PowerResource;
pub use resource::Entity as Resource;
pub use role::Entity as Role;
pub use role_power::Entity as RolePower;
pub use role_user::Entity as RoleUser;
pub use role_user_group::Entity as RoleUserGroup;
pub use user::Entity as User;
pub use user_group::Entity as UserGroup;
pub use user_user_group::Entity as UserUserGroup;

use crate::core::models::Audit;
use sea_orm::prelude::DateTimeUtc;

/// Rebuild the audit block from its four columns
pub(crate) fn audit_from_columns(
    created_by: &Option<String>,
    created_at: DateTimeUtc,
    updated_by: &Option<String>,
    updated_at: DateTimeUtc,
) -> Audit {
    Audit {
        created_by: created_by.clone(),
        created_at,
        updated_by: updated_by.clone(),
        updated_at,
    }
}
