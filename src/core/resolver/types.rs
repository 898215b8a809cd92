//! Resolution result types

use crate::core::models::{Power, PowerGrant, PowerId, RoleId, UserGroupId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Full trace of one resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPermissions {
    /// Resolved user
    pub user_id: UserId,
    /// Roles assigned directly
    pub direct_role_ids: BTreeSet<RoleId>,
    /// Groups the user belongs to
    pub group_ids: BTreeSet<UserGroupId>,
    /// Roles granted to those groups
    pub group_role_ids: BTreeSet<RoleId>,
    /// Union of direct and group roles
    pub role_ids: BTreeSet<RoleId>,
    /// Powers granted to the union
    pub power_ids: BTreeSet<PowerId>,
    /// Power records, ordered by id
    pub powers: Vec<Power>,
}

impl ResolvedPermissions {
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    /// Payload form of the powers
    pub fn grants(&self) -> Vec<PowerGrant> {
        self.powers.iter().map(PowerGrant::from).collect()
    }
}
