//! External identity provider seam

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

/// Identity returned by the external provider for a one-time code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentity {
    /// Stable id of the account at the provider
    pub external_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Exchanges a provider code for the identity behind it
///
/// Implementations own the network call; failures map to
/// `RbacError::StorageUnavailable` when the provider cannot be reached and
/// `RbacError::InvalidCredentials` when it rejects the code.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialLookup: Send + Sync {
    async fn exchange(&self, code: &str) -> Result<ExternalIdentity>;
}
