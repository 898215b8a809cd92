//! Tests for permission resolution

use super::PermissionResolver;
use crate::config::ResolverConfig;
use crate::core::models::{EntityState, PowerAction, PowerId, RoleId, UserGroupId, UserId};
use crate::core::stores::{
    GroupMembershipStore, GroupRoleStore, MockGroupMembershipStore, MockGroupRoleStore,
    MockPowerStore, MockRoleAssignmentStore, MockRolePowerStore, RoleAssignmentStore,
    RolePowerStore,
};
use crate::storage::memory::MemoryStore;
use crate::utils::error::{RbacError, Result};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

fn ids(powers: &[crate::core::models::Power]) -> Vec<PowerId> {
    powers.iter().map(|p| p.id).collect()
}

fn resolver_over(store: &Arc<MemoryStore>) -> PermissionResolver {
    PermissionResolver::from_store(store.clone(), ResolverConfig::default())
}

/// U1 -> R1 -> P1 directly, U1 -> G1 -> R2 -> P2 through a group
struct Scenario {
    store: Arc<MemoryStore>,
    u1: UserId,
    r1: RoleId,
    r2: RoleId,
    g1: UserGroupId,
    p1: PowerId,
    p2: PowerId,
}

async fn scenario() -> Scenario {
    let store = Arc::new(MemoryStore::new());
    let u1 = store.add_user("u1");
    let r1 = store.add_role("r1");
    let r2 = store.add_role("r2");
    let g1 = store.add_group("g1");
    let p1 = store.add_power("article", PowerAction::View, "view articles");
    let p2 = store.add_power("article", PowerAction::Update, "edit articles");

    store.set_user_roles(u1, &[r1]).await.unwrap();
    store.set_role_powers(r1, &[p1]).await.unwrap();
    store.set_user_groups(u1, &[g1]).await.unwrap();
    store.set_group_roles(g1, &[r2]).await.unwrap();
    store.set_role_powers(r2, &[p2]).await.unwrap();

    Scenario {
        store,
        u1,
        r1,
        r2,
        g1,
        p1,
        p2,
    }
}

// ==================== Resolution Properties ====================

#[tokio::test]
async fn test_end_to_end_union_of_both_paths() {
    let s = scenario().await;
    let resolver = resolver_over(&s.store);

    let powers = resolver.resolve(s.u1).await.unwrap();
    assert_eq!(ids(&powers), vec![s.p1, s.p2]);

    // Granting P2 a second time through R1 must not duplicate it
    s.store.set_role_powers(s.r1, &[s.p1, s.p2]).await.unwrap();
    let powers = resolver.resolve(s.u1).await.unwrap();
    assert_eq!(ids(&powers), vec![s.p1, s.p2]);
}

#[tokio::test]
async fn test_detailed_result_exposes_both_paths() {
    let s = scenario().await;
    let resolved = resolver_over(&s.store).resolve_detailed(s.u1).await.unwrap();

    assert_eq!(resolved.user_id, s.u1);
    assert_eq!(resolved.direct_role_ids, BTreeSet::from([s.r1]));
    assert_eq!(resolved.group_ids, BTreeSet::from([s.g1]));
    assert_eq!(resolved.group_role_ids, BTreeSet::from([s.r2]));
    assert_eq!(resolved.role_ids, BTreeSet::from([s.r1, s.r2]));
    assert_eq!(resolved.power_ids, BTreeSet::from([s.p1, s.p2]));
    assert_eq!(resolved.grants().len(), 2);
}

#[tokio::test]
async fn test_role_reached_through_both_paths_counts_once() {
    let s = scenario().await;
    s.store.set_user_roles(s.u1, &[s.r1, s.r2]).await.unwrap();

    let resolved = resolver_over(&s.store).resolve_detailed(s.u1).await.unwrap();
    assert_eq!(resolved.role_ids, BTreeSet::from([s.r1, s.r2]));
    assert_eq!(ids(&resolved.powers), vec![s.p1, s.p2]);
}

#[tokio::test]
async fn test_user_without_grants_resolves_to_empty() {
    let store = Arc::new(MemoryStore::new());
    let loner = store.add_user("loner");

    let resolved = resolver_over(&store).resolve_detailed(loner).await.unwrap();
    assert!(resolved.is_empty());
    assert!(resolved.role_ids.is_empty());
}

#[tokio::test]
async fn test_unknown_user_resolves_to_empty() {
    let store = Arc::new(MemoryStore::new());
    let powers = resolver_over(&store).resolve(UserId(4242)).await.unwrap();
    assert!(powers.is_empty());
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let s = scenario().await;
    let resolver = resolver_over(&s.store);

    let first = resolver.resolve_detailed(s.u1).await.unwrap();
    let second = resolver.resolve_detailed(s.u1).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_disabled_role_still_grants() {
    let s = scenario().await;
    assert!(s.store.set_role_state(s.r1, EntityState::Disabled));

    let powers = resolver_over(&s.store).resolve(s.u1).await.unwrap();
    assert_eq!(ids(&powers), vec![s.p1, s.p2]);
}

#[tokio::test]
async fn test_clearing_direct_roles_keeps_group_grants() {
    let s = scenario().await;
    s.store.set_user_roles(s.u1, &[]).await.unwrap();

    let powers = resolver_over(&s.store).resolve(s.u1).await.unwrap();
    assert_eq!(ids(&powers), vec![s.p2]);
}

#[tokio::test]
async fn test_parent_role_grants_are_not_inherited() {
    let store = Arc::new(MemoryStore::new());
    let user = store.add_user("child-holder");
    let parent = store.add_role("parent");
    let child = store.add_child_role("child", parent);
    let parent_power = store.add_power("settings", PowerAction::Manage, "manage settings");

    store.set_role_powers(parent, &[parent_power]).await.unwrap();
    store.set_user_roles(user, &[child]).await.unwrap();

    let powers = resolver_over(&store).resolve(user).await.unwrap();
    assert!(powers.is_empty());
}

#[tokio::test]
async fn test_missing_power_records_are_skipped() {
    let s = scenario().await;
    assert!(s.store.remove_power_record(s.p1).is_some());

    let powers = resolver_over(&s.store).resolve(s.u1).await.unwrap();
    assert_eq!(ids(&powers), vec![s.p2]);
}

#[tokio::test]
async fn test_sequential_and_parallel_lookups_agree() {
    let s = scenario().await;
    let parallel = resolver_over(&s.store);
    let sequential = PermissionResolver::from_store(
        s.store.clone(),
        ResolverConfig {
            parallel_lookups: false,
            ..ResolverConfig::default()
        },
    );

    assert_eq!(
        parallel.resolve_detailed(s.u1).await.unwrap(),
        sequential.resolve_detailed(s.u1).await.unwrap()
    );
}

#[tokio::test]
async fn test_concurrent_resolutions_share_one_resolver() {
    let s = scenario().await;
    let resolver = Arc::new(resolver_over(&s.store));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            let user = s.u1;
            tokio::spawn(async move { resolver.resolve(user).await })
        })
        .collect();

    for handle in handles {
        let powers = handle.await.unwrap().unwrap();
        assert_eq!(ids(&powers), vec![s.p1, s.p2]);
    }
}

// ==================== Failure Propagation ====================

fn unavailable<T>() -> Result<T> {
    Err(RbacError::storage_unavailable("connection refused"))
}

#[tokio::test]
async fn test_membership_failure_fails_whole_resolution() {
    let mut roles = MockRoleAssignmentStore::new();
    roles
        .expect_roles_for_user()
        .returning(|_| Ok(BTreeSet::from([RoleId(1)])));
    let mut memberships = MockGroupMembershipStore::new();
    memberships
        .expect_groups_for_user()
        .returning(|_| unavailable());
    let mut group_roles = MockGroupRoleStore::new();
    group_roles.expect_roles_for_groups().never();
    let mut role_powers = MockRolePowerStore::new();
    role_powers.expect_powers_for_roles().never();
    let mut powers = MockPowerStore::new();
    powers.expect_powers_by_ids().never();

    let resolver = PermissionResolver::new(
        Arc::new(roles),
        Arc::new(memberships),
        Arc::new(group_roles),
        Arc::new(role_powers),
        Arc::new(powers),
        ResolverConfig::default(),
    );

    let err = resolver.resolve(UserId(1)).await.unwrap_err();
    assert!(err.is_storage_unavailable());
}

#[tokio::test]
async fn test_power_lookup_failure_is_not_an_empty_result() {
    let mut roles = MockRoleAssignmentStore::new();
    roles
        .expect_roles_for_user()
        .returning(|_| Ok(BTreeSet::from([RoleId(1)])));
    let mut memberships = MockGroupMembershipStore::new();
    memberships
        .expect_groups_for_user()
        .returning(|_| Ok(BTreeSet::new()));
    let mut group_roles = MockGroupRoleStore::new();
    group_roles
        .expect_roles_for_groups()
        .returning(|_| Ok(BTreeSet::new()));
    let mut role_powers = MockRolePowerStore::new();
    role_powers
        .expect_powers_for_roles()
        .withf(|role_ids| role_ids.len() == 1 && role_ids.contains(&RoleId(1)))
        .times(1)
        .returning(|_| Ok(BTreeSet::from([PowerId(10)])));
    let mut powers = MockPowerStore::new();
    powers
        .expect_powers_by_ids()
        .times(1)
        .returning(|_| Err(RbacError::Database(sea_orm::DbErr::Custom("gone".into()))));

    let resolver = PermissionResolver::new(
        Arc::new(roles),
        Arc::new(memberships),
        Arc::new(group_roles),
        Arc::new(role_powers),
        Arc::new(powers),
        ResolverConfig::default(),
    );

    let err = resolver.resolve(UserId(1)).await.unwrap_err();
    assert!(matches!(err, RbacError::Database(_)));
    assert_eq!(err.http_status(), 503);
}

#[tokio::test]
async fn test_offline_backend_fails_resolution() {
    let s = scenario().await;
    s.store.set_offline(true);

    let err = resolver_over(&s.store).resolve(s.u1).await.unwrap_err();
    assert!(matches!(err, RbacError::StorageUnavailable(_)));
}

// ==================== Deadlines and Cancellation ====================

/// Delegates to a memory store after sleeping on the first lookup
struct SlowStore {
    inner: Arc<MemoryStore>,
    delay: Duration,
}

#[async_trait]
impl RoleAssignmentStore for SlowStore {
    async fn roles_for_user(&self, user_id: UserId) -> Result<BTreeSet<RoleId>> {
        tokio::time::sleep(self.delay).await;
        self.inner.roles_for_user(user_id).await
    }

    async fn roles_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, BTreeSet<RoleId>>> {
        self.inner.roles_for_users(user_ids).await
    }

    async fn set_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<()> {
        self.inner.set_user_roles(user_id, role_ids).await
    }

    async fn users_for_role(&self, role_id: RoleId) -> Result<BTreeSet<UserId>> {
        self.inner.users_for_role(role_id).await
    }

    async fn set_role_users(&self, role_id: RoleId, user_ids: &[UserId]) -> Result<()> {
        self.inner.set_role_users(role_id, user_ids).await
    }
}

fn slow_resolver(
    store: &Arc<MemoryStore>,
    delay: Duration,
    config: ResolverConfig,
) -> PermissionResolver {
    PermissionResolver::new(
        Arc::new(SlowStore {
            inner: store.clone(),
            delay,
        }),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        config,
    )
}

#[tokio::test]
async fn test_deadline_expiry_is_a_timeout() {
    let s = scenario().await;
    let resolver = slow_resolver(&s.store, Duration::from_secs(5), ResolverConfig::default());

    let err = resolver
        .resolve_with_deadline(s.u1, Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(matches!(err, RbacError::Timeout(_)));
}

#[tokio::test]
async fn test_configured_timeout_applies_to_resolve() {
    let s = scenario().await;
    let config = ResolverConfig {
        timeout_ms: 20,
        ..ResolverConfig::default()
    };
    let resolver = slow_resolver(&s.store, Duration::from_secs(5), config);

    let err = resolver.resolve(s.u1).await.unwrap_err();
    assert!(matches!(err, RbacError::Timeout(_)));
}

#[tokio::test]
async fn test_generous_deadline_returns_full_result() {
    let s = scenario().await;
    let resolver = slow_resolver(&s.store, Duration::from_millis(5), ResolverConfig::default());

    let powers = resolver
        .resolve_with_deadline(s.u1, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(ids(&powers), vec![s.p1, s.p2]);
}

#[tokio::test]
async fn test_cancellation_wins_over_slow_lookup() {
    let s = scenario().await;
    let resolver = slow_resolver(&s.store, Duration::from_secs(5), ResolverConfig::default());
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let cancel = async move {
        let _ = rx.await;
    };
    let task = tokio::spawn(async move { resolver.resolve_until(s.u1, cancel).await });
    tx.send(()).unwrap();

    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, RbacError::Cancelled(_)));
}

#[tokio::test]
async fn test_pending_cancellation_does_not_interfere() {
    let s = scenario().await;
    let resolver = resolver_over(&s.store);

    let powers = resolver
        .resolve_until(s.u1, std::future::pending::<()>())
        .await
        .unwrap();
    assert_eq!(ids(&powers), vec![s.p1, s.p2]);
}

#[tokio::test]
async fn test_group_stores_are_consulted_with_member_groups() {
    let s = scenario().await;
    let groups = s.store.groups_for_user(s.u1).await.unwrap();
    let roles = s.store.roles_for_groups(&groups).await.unwrap();
    assert_eq!(roles, BTreeSet::from([s.r2]));
    assert_eq!(
        s.store.powers_for_roles(&roles).await.unwrap(),
        BTreeSet::from([s.p2])
    );
}
