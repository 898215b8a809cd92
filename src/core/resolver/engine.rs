//! Resolver implementation

use super::types::ResolvedPermissions;
use crate::config::ResolverConfig;
use crate::core::models::{Power, UserId};
use crate::core::stores::{
    GroupMembershipStore, GroupRoleStore, PermissionStores, PowerStore, RoleAssignmentStore,
    RolePowerStore,
};
use crate::utils::error::{RbacError, Result};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Computes a user's effective powers from the five lookup stores
///
/// Holds no mutable state; share it behind an `Arc` and call it from as many
/// tasks as needed. A failing lookup fails the whole resolution.
#[derive(Clone)]
pub struct PermissionResolver {
    role_assignments: Arc<dyn RoleAssignmentStore>,
    memberships: Arc<dyn GroupMembershipStore>,
    group_roles: Arc<dyn GroupRoleStore>,
    role_powers: Arc<dyn RolePowerStore>,
    powers: Arc<dyn PowerStore>,
    config: ResolverConfig,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PermissionResolver {
    /// Create a resolver over separate stores
    pub fn new(
        role_assignments: Arc<dyn RoleAssignmentStore>,
        memberships: Arc<dyn GroupMembershipStore>,
        group_roles: Arc<dyn GroupRoleStore>,
        role_powers: Arc<dyn RolePowerStore>,
        powers: Arc<dyn PowerStore>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            role_assignments,
            memberships,
            group_roles,
            role_powers,
            powers,
            config,
        }
    }

    /// Create a resolver over one backend implementing every store
    pub fn from_store<S>(store: Arc<S>, config: ResolverConfig) -> Self
    where
        S: PermissionStores + 'static,
    {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            config,
        )
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Effective powers of a user, ordered by id
    pub async fn resolve(&self, user_id: UserId) -> Result<Vec<Power>> {
        Ok(self.resolve_detailed(user_id).await?.powers)
    }

    /// Effective powers together with the role and group sets that produced them
    ///
    /// Applies the configured timeout when it is non-zero.
    pub async fn resolve_detailed(&self, user_id: UserId) -> Result<ResolvedPermissions> {
        match self.config.timeout() {
            Some(deadline) => self.traverse_within(user_id, deadline).await,
            None => self.traverse(user_id).await,
        }
    }

    /// Resolve, failing with [`RbacError::Timeout`] once `deadline` elapses
    pub async fn resolve_with_deadline(
        &self,
        user_id: UserId,
        deadline: Duration,
    ) -> Result<Vec<Power>> {
        Ok(self.traverse_within(user_id, deadline).await?.powers)
    }

    /// Resolve unless `cancel` completes first, in which case
    /// [`RbacError::Cancelled`] is returned and no partial result escapes
    pub async fn resolve_until<F>(&self, user_id: UserId, cancel: F) -> Result<Vec<Power>>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                warn!("Permission resolution for user {} cancelled", user_id);
                Err(RbacError::cancelled(format!(
                    "Permission resolution for user {} was cancelled",
                    user_id
                )))
            }
            resolved = self.resolve_detailed(user_id) => resolved.map(|r| r.powers),
        }
    }

    async fn traverse_within(
        &self,
        user_id: UserId,
        deadline: Duration,
    ) -> Result<ResolvedPermissions> {
        match tokio::time::timeout(deadline, self.traverse(user_id)).await {
            Ok(resolved) => resolved,
            Err(_) => {
                warn!(
                    "Permission resolution for user {} exceeded {:?}",
                    user_id, deadline
                );
                Err(RbacError::timeout(format!(
                    "Permission resolution for user {} exceeded {}ms",
                    user_id,
                    deadline.as_millis()
                )))
            }
        }
    }

    async fn traverse(&self, user_id: UserId) -> Result<ResolvedPermissions> {
        debug!("Resolving permissions for user: {}", user_id);

        // Direct roles and memberships are independent lookups
        let (direct_role_ids, group_ids) = if self.config.parallel_lookups {
            futures::try_join!(
                self.role_assignments.roles_for_user(user_id),
                self.memberships.groups_for_user(user_id),
            )?
        } else {
            let direct = self.role_assignments.roles_for_user(user_id).await?;
            let groups = self.memberships.groups_for_user(user_id).await?;
            (direct, groups)
        };

        let group_role_ids = self.group_roles.roles_for_groups(&group_ids).await?;

        let role_ids: BTreeSet<_> = direct_role_ids.union(&group_role_ids).copied().collect();
        let power_ids = self.role_powers.powers_for_roles(&role_ids).await?;

        let mut powers = self.powers.powers_by_ids(&power_ids).await?;
        powers.sort_by_key(|power| power.id);
        powers.dedup_by_key(|power| power.id);

        debug!(
            "Resolved {} powers for user {} from {} roles ({} direct, {} via {} groups)",
            powers.len(),
            user_id,
            role_ids.len(),
            direct_role_ids.len(),
            group_role_ids.len(),
            group_ids.len()
        );

        Ok(ResolvedPermissions {
            user_id,
            direct_role_ids,
            group_ids,
            group_role_ids,
            role_ids,
            power_ids,
            powers,
        })
    }
}
