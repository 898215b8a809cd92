//! Role model

use super::{Audit, EntityState, PowerId, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named bundle of powers
///
/// `parent_id` only records where the role sits in the admin tree. A child
/// role does not inherit its parent's powers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub parent_id: Option<RoleId>,
    pub name: String,
    pub description: Option<String>,
    pub state: EntityState,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub name: String,
    pub parent_id: Option<RoleId>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub parent_id: Option<RoleId>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFilter {
    /// Substring match on the name
    pub name: Option<String>,
    /// Exact parent
    pub parent_id: Option<RoleId>,
}

/// A role together with the powers granted to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetail {
    #[serde(flatten)]
    pub role: Role,
    pub power_ids: BTreeSet<PowerId>,
}
