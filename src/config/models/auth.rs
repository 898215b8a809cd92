//! Authentication configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Accept self-service registration
    #[serde(default = "default_true")]
    pub allow_registration: bool,
    /// Accept logins through the external identity provider
    #[serde(default)]
    pub external_login_enabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            external_login_enabled: false,
        }
    }
}
