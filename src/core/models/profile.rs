//! Login and profile payloads

use super::{Power, PowerAction, PowerId, Role, RoleId, User, UserGroup, UserGroupId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Power as embedded in a session or profile payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerGrant {
    pub id: PowerId,
    pub resource_key: String,
    pub action: PowerAction,
    pub name: String,
}

impl From<&Power> for PowerGrant {
    fn from(power: &Power) -> Self {
        Self {
            id: power.id,
            resource_key: power.resource_key.clone(),
            action: power.action,
            name: power.name.clone(),
        }
    }
}

impl From<Power> for PowerGrant {
    fn from(power: Power) -> Self {
        Self {
            id: power.id,
            resource_key: power.resource_key,
            action: power.action,
            name: power.name,
        }
    }
}

/// A user with their effective permissions
///
/// Built identically at login and at profile fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    /// Roles assigned directly to the user
    pub user_role_ids: BTreeSet<RoleId>,
    /// Groups the user belongs to
    pub user_group_ids: BTreeSet<UserGroupId>,
    /// Roles reached through the user's groups
    pub user_group_role_ids: BTreeSet<RoleId>,
    /// Records of every role the user holds, direct or through a group
    pub roles: Vec<Role>,
    /// Records of the user's groups
    pub groups: Vec<UserGroup>,
    /// Effective powers, one entry per power, ordered by id
    pub powers: Vec<PowerGrant>,
}
