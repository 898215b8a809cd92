//! Lookup collaborators for permission resolution
//!
//! Each store is a keyed view over one join table. Lookups return an empty set
//! when there are no rows and propagate storage failures unchanged. Every
//! `set_*` call replaces the full association set of one entity as a single
//! atomic unit; an empty slice clears it. Ids that do not name an existing
//! entity are rejected with [`RbacError::InvalidReference`] and nothing is
//! written.
//!
//! [`RbacError::InvalidReference`]: crate::utils::error::RbacError::InvalidReference

use crate::core::models::{
    Power, PowerId, ResourceId, Role, RoleId, UserGroup, UserGroupId, UserId,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

#[cfg(test)]
use mockall::automock;

/// User to directly assigned roles
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoleAssignmentStore: Send + Sync {
    /// Roles assigned directly to a user
    async fn roles_for_user(&self, user_id: UserId) -> Result<BTreeSet<RoleId>>;

    /// Batch form of [`roles_for_user`](Self::roles_for_user); every requested
    /// user is present in the map
    async fn roles_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, BTreeSet<RoleId>>>;

    /// Replace the roles assigned to a user
    async fn set_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<()>;

    /// Users a role is directly assigned to
    async fn users_for_role(&self, role_id: RoleId) -> Result<BTreeSet<UserId>>;

    /// Replace the users a role is assigned to
    async fn set_role_users(&self, role_id: RoleId, user_ids: &[UserId]) -> Result<()>;
}

/// User to group membership
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GroupMembershipStore: Send + Sync {
    async fn groups_for_user(&self, user_id: UserId) -> Result<BTreeSet<UserGroupId>>;

    async fn set_user_groups(&self, user_id: UserId, group_ids: &[UserGroupId]) -> Result<()>;

    async fn users_in_group(&self, group_id: UserGroupId) -> Result<BTreeSet<UserId>>;

    async fn set_group_users(&self, group_id: UserGroupId, user_ids: &[UserId]) -> Result<()>;
}

/// Group to granted roles
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GroupRoleStore: Send + Sync {
    /// Union of the roles granted to any of the groups
    async fn roles_for_groups(&self, group_ids: &BTreeSet<UserGroupId>) -> Result<BTreeSet<RoleId>>;

    async fn set_group_roles(&self, group_id: UserGroupId, role_ids: &[RoleId]) -> Result<()>;

    async fn groups_for_role(&self, role_id: RoleId) -> Result<BTreeSet<UserGroupId>>;

    async fn set_role_groups(&self, role_id: RoleId, group_ids: &[UserGroupId]) -> Result<()>;
}

/// Role to granted powers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RolePowerStore: Send + Sync {
    /// Union of the powers granted to any of the roles
    async fn powers_for_roles(&self, role_ids: &BTreeSet<RoleId>) -> Result<BTreeSet<PowerId>>;

    async fn set_role_powers(&self, role_id: RoleId, power_ids: &[PowerId]) -> Result<()>;

    async fn roles_for_power(&self, power_id: PowerId) -> Result<BTreeSet<RoleId>>;

    async fn set_power_roles(&self, power_id: PowerId, role_ids: &[RoleId]) -> Result<()>;
}

/// Power records by id
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PowerStore: Send + Sync {
    /// Existing powers among `power_ids`, ordered by id; unknown ids are skipped
    async fn powers_by_ids(&self, power_ids: &BTreeSet<PowerId>) -> Result<Vec<Power>>;
}

/// Role and group records by id, for profile payloads
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Existing roles among `role_ids`, ordered by id; unknown ids are skipped
    async fn roles_by_ids(&self, role_ids: &BTreeSet<RoleId>) -> Result<Vec<Role>>;

    /// Existing groups among `group_ids`, ordered by id; unknown ids are skipped
    async fn user_groups_by_ids(&self, group_ids: &BTreeSet<UserGroupId>)
    -> Result<Vec<UserGroup>>;
}

/// Power to resource association
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PowerResourceStore: Send + Sync {
    async fn powers_for_resource(&self, resource_id: ResourceId) -> Result<BTreeSet<PowerId>>;

    async fn resources_for_power(&self, power_id: PowerId) -> Result<BTreeSet<ResourceId>>;

    async fn set_resource_powers(&self, resource_id: ResourceId, power_ids: &[PowerId])
    -> Result<()>;

    async fn set_power_resources(&self, power_id: PowerId, resource_ids: &[ResourceId])
    -> Result<()>;
}

/// Every lookup the resolver needs, served by one backend
pub trait PermissionStores:
    RoleAssignmentStore + GroupMembershipStore + GroupRoleStore + RolePowerStore + PowerStore
{
}

impl<T> PermissionStores for T where
    T: RoleAssignmentStore + GroupMembershipStore + GroupRoleStore + RolePowerStore + PowerStore
{
}
