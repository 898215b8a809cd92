//! Core data models for the RBAC backend
//!
//! This module defines the entities, association inputs and response shapes
//! shared by the stores, the resolver and the services.

pub mod ids;
pub mod page;
pub mod power;
pub mod profile;
pub mod resource;
pub mod role;
pub mod state;
pub mod user;
pub mod user_group;

// Re-export commonly used types
pub use ids::{PowerId, ResourceId, RoleId, UserGroupId, UserId};
pub use page::{Page, PageQuery};
pub use power::{NewPower, Power, PowerAction, PowerFilter, PowerUpdate};
pub use profile::{PowerGrant, UserProfile};
pub use resource::{NewResource, Resource, ResourceDetail, ResourceFilter, ResourceUpdate};
pub use role::{NewRole, Role, RoleDetail, RoleFilter, RoleUpdate};
pub use state::{EntityState, StateChange};
pub use user::{NewUser, User, UserFilter, UserUpdate};
pub use user_group::{
    NewUserGroup, UserGroup, UserGroupDetail, UserGroupFilter, UserGroupUpdate,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creator/updater bookkeeping carried by every entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    /// Who created the row
    pub created_by: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Who last changed the row
    pub updated_by: Option<String>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for Audit {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created_by: None,
            created_at: now,
            updated_by: None,
            updated_at: now,
        }
    }
}

impl Audit {
    /// Audit block for a row created now by `operator`
    pub fn created_by(operator: Option<&str>) -> Self {
        let operator = operator.map(str::to_string);
        Self {
            created_by: operator.clone(),
            updated_by: operator,
            ..Self::default()
        }
    }

    /// Record a change by `operator`
    pub fn touch(&mut self, operator: Option<&str>) {
        self.updated_at = Utc::now();
        if let Some(operator) = operator {
            self.updated_by = Some(operator.to_string());
        }
    }
}
