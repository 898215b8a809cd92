//! User group model

use super::{Audit, EntityState, RoleId, UserGroupId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named collection of users that roles can be granted to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub id: UserGroupId,
    pub name: String,
    pub description: Option<String>,
    pub state: EntityState,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserGroup {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupFilter {
    pub name: Option<String>,
}

/// A group with its members and granted roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupDetail {
    #[serde(flatten)]
    pub group: UserGroup,
    pub user_ids: BTreeSet<UserId>,
    pub role_ids: BTreeSet<RoleId>,
}
