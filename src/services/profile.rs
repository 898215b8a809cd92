//! Effective-permission profile assembly

use crate::core::models::{User, UserProfile};
use crate::core::resolver::PermissionResolver;
use crate::core::stores::DirectoryStore;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::debug;

/// Builds the profile payload returned at login and at profile fetch
#[derive(Clone)]
pub struct ProfileService {
    resolver: Arc<PermissionResolver>,
    directory: Arc<dyn DirectoryStore>,
}

impl std::fmt::Debug for ProfileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileService")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl ProfileService {
    pub fn new(resolver: Arc<PermissionResolver>, directory: Arc<dyn DirectoryStore>) -> Self {
        Self {
            resolver,
            directory,
        }
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Attach resolved permissions to a user
    ///
    /// A storage failure during resolution fails the whole call; no partial
    /// profile is produced.
    pub async fn profile(&self, user: User) -> Result<UserProfile> {
        let resolved = self.resolver.resolve_detailed(user.id).await?;
        debug!(
            "Profile for user {}: {} roles, {} powers",
            user.id,
            resolved.role_ids.len(),
            resolved.powers.len()
        );

        let (roles, groups) = futures::try_join!(
            self.directory.roles_by_ids(&resolved.role_ids),
            self.directory.user_groups_by_ids(&resolved.group_ids),
        )?;

        let powers = resolved.grants();
        Ok(UserProfile {
            user,
            user_role_ids: resolved.direct_role_ids,
            user_group_ids: resolved.group_ids,
            user_group_role_ids: resolved.group_role_ids,
            roles,
            groups,
            powers,
        })
    }
}
