//! User account model

use super::{Audit, EntityState, UserId};
use serde::{Deserialize, Serialize};

/// Administrative user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Login name (unique)
    pub username: String,
    /// Argon2 password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Avatar URL
    pub avatar: Option<String>,
    /// Identity at the external login provider, once bound
    pub external_id: Option<String>,
    /// Lifecycle state
    pub state: EntityState,
    /// Audit fields
    #[serde(flatten)]
    pub audit: Audit,
}

impl User {
    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }
}

/// Registration input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

/// Profile update input; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

/// Listing filter; every set field is a substring match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
