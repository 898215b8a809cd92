//! In-memory backend
//!
//! Keeps every entity and join table behind a single `RwLock`, so a rebind is
//! one write-lock critical section and a lookup never sees a half-applied
//! replace. Used for embedding and tests.

use crate::core::models::{
    Audit, EntityState, Power, PowerAction, PowerId, Resource, ResourceId, Role, RoleId, User,
    UserGroup, UserGroupId, UserId,
};
use crate::core::stores::{
    DirectoryStore, GroupMembershipStore, GroupRoleStore, PowerResourceStore, PowerStore, RoleAssignmentStore,
    RolePowerStore,
};
use crate::utils::error::{RbacError, ReferenceKind, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    users: BTreeMap<UserId, User>,
    roles: BTreeMap<RoleId, Role>,
    groups: BTreeMap<UserGroupId, UserGroup>,
    powers: BTreeMap<PowerId, Power>,
    resources: BTreeMap<ResourceId, Resource>,
    role_users: BTreeSet<(RoleId, UserId)>,
    role_groups: BTreeSet<(RoleId, UserGroupId)>,
    user_groups: BTreeSet<(UserId, UserGroupId)>,
    role_powers: BTreeSet<(RoleId, PowerId)>,
    power_resources: BTreeSet<(PowerId, ResourceId)>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Fail unless every id in `ids` is a key of `table`
fn ensure_known<K: Ord + Copy + Into<i32>, V>(
    table: &BTreeMap<K, V>,
    kind: ReferenceKind,
    ids: impl IntoIterator<Item = K>,
) -> Result<()> {
    let missing: Vec<i32> = ids
        .into_iter()
        .filter(|id| !table.contains_key(id))
        .map(Into::into)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RbacError::invalid_reference(kind, missing))
    }
}

/// Replace every row whose left side is `left`
fn replace_by_left<A: Ord + Copy, B: Ord + Copy>(rows: &mut BTreeSet<(A, B)>, left: A, rights: &[B]) {
    rows.retain(|(a, _)| *a != left);
    rows.extend(rights.iter().map(|b| (left, *b)));
}

/// Replace every row whose right side is `right`
fn replace_by_right<A: Ord + Copy, B: Ord + Copy>(
    rows: &mut BTreeSet<(A, B)>,
    right: B,
    lefts: &[A],
) {
    rows.retain(|(_, b)| *b != right);
    rows.extend(lefts.iter().map(|a| (*a, right)));
}

fn rights_of<A: Ord + Copy, B: Ord + Copy>(rows: &BTreeSet<(A, B)>, left: A) -> BTreeSet<B> {
    rows.iter().filter(|(a, _)| *a == left).map(|(_, b)| *b).collect()
}

fn lefts_of<A: Ord + Copy, B: Ord + Copy>(rows: &BTreeSet<(A, B)>, right: B) -> BTreeSet<A> {
    rows.iter().filter(|(_, b)| *b == right).map(|(a, _)| *a).collect()
}

/// In-memory implementation of every lookup store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while offline every call fails with `StorageUnavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RbacError::storage_unavailable("memory store is offline"))
        } else {
            Ok(())
        }
    }

    pub fn add_user(&self, username: &str) -> UserId {
        let mut tables = self.tables.write();
        let id = UserId(tables.next_id());
        tables.users.insert(
            id,
            User {
                id,
                username: username.to_string(),
                password_hash: String::new(),
                name: None,
                email: None,
                phone: None,
                avatar: None,
                external_id: None,
                state: EntityState::Enabled,
                audit: Audit::default(),
            },
        );
        id
    }

    pub fn add_role(&self, name: &str) -> RoleId {
        let mut tables = self.tables.write();
        let id = RoleId(tables.next_id());
        tables.roles.insert(
            id,
            Role {
                id,
                parent_id: None,
                name: name.to_string(),
                description: None,
                state: EntityState::Enabled,
                audit: Audit::default(),
            },
        );
        id
    }

    /// Add a role under `parent`; the parent link carries no grants
    pub fn add_child_role(&self, name: &str, parent: RoleId) -> RoleId {
        let id = self.add_role(name);
        if let Some(role) = self.tables.write().roles.get_mut(&id) {
            role.parent_id = Some(parent);
        }
        id
    }

    pub fn add_group(&self, name: &str) -> UserGroupId {
        let mut tables = self.tables.write();
        let id = UserGroupId(tables.next_id());
        tables.groups.insert(
            id,
            UserGroup {
                id,
                name: name.to_string(),
                description: None,
                state: EntityState::Enabled,
                audit: Audit::default(),
            },
        );
        id
    }

    pub fn add_power(&self, resource_key: &str, action: PowerAction, name: &str) -> PowerId {
        let mut tables = self.tables.write();
        let id = PowerId(tables.next_id());
        tables.powers.insert(
            id,
            Power {
                id,
                resource_key: resource_key.to_string(),
                action,
                name: name.to_string(),
                description: None,
                state: EntityState::Enabled,
                audit: Audit::default(),
            },
        );
        id
    }

    pub fn add_resource(&self, key: &str, name: &str) -> ResourceId {
        let mut tables = self.tables.write();
        let id = ResourceId(tables.next_id());
        tables.resources.insert(
            id,
            Resource {
                id,
                key: key.to_string(),
                name: name.to_string(),
                description: None,
                state: EntityState::Enabled,
                audit: Audit::default(),
            },
        );
        id
    }

    /// Flip a role's state; returns false for an unknown role
    pub fn set_role_state(&self, role_id: RoleId, state: EntityState) -> bool {
        match self.tables.write().roles.get_mut(&role_id) {
            Some(role) => {
                role.state = state;
                true
            }
            None => false,
        }
    }

    /// Drop a power record while leaving its grant rows in place
    pub fn remove_power_record(&self, power_id: PowerId) -> Option<Power> {
        self.tables.write().powers.remove(&power_id)
    }

    pub fn user(&self, user_id: UserId) -> Option<User> {
        self.tables.read().users.get(&user_id).cloned()
    }

    pub fn role(&self, role_id: RoleId) -> Option<Role> {
        self.tables.read().roles.get(&role_id).cloned()
    }
}

#[async_trait]
impl RoleAssignmentStore for MemoryStore {
    async fn roles_for_user(&self, user_id: UserId) -> Result<BTreeSet<RoleId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(lefts_of(&tables.role_users, user_id))
    }

    async fn roles_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, BTreeSet<RoleId>>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(user_ids
            .iter()
            .map(|user_id| (*user_id, lefts_of(&tables.role_users, *user_id)))
            .collect())
    }

    async fn set_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<()> {
        self.check_online()?;
        debug!("Replacing roles of user {}: {:?}", user_id, role_ids);
        let mut tables = self.tables.write();
        ensure_known(&tables.users, ReferenceKind::User, [user_id])?;
        ensure_known(&tables.roles, ReferenceKind::Role, role_ids.iter().copied())?;
        replace_by_right(&mut tables.role_users, user_id, role_ids);
        Ok(())
    }

    async fn users_for_role(&self, role_id: RoleId) -> Result<BTreeSet<UserId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(rights_of(&tables.role_users, role_id))
    }

    async fn set_role_users(&self, role_id: RoleId, user_ids: &[UserId]) -> Result<()> {
        self.check_online()?;
        debug!("Replacing users of role {}: {:?}", role_id, user_ids);
        let mut tables = self.tables.write();
        ensure_known(&tables.roles, ReferenceKind::Role, [role_id])?;
        ensure_known(&tables.users, ReferenceKind::User, user_ids.iter().copied())?;
        replace_by_left(&mut tables.role_users, role_id, user_ids);
        Ok(())
    }
}

#[async_trait]
impl GroupMembershipStore for MemoryStore {
    async fn groups_for_user(&self, user_id: UserId) -> Result<BTreeSet<UserGroupId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(rights_of(&tables.user_groups, user_id))
    }

    async fn set_user_groups(&self, user_id: UserId, group_ids: &[UserGroupId]) -> Result<()> {
        self.check_online()?;
        debug!("Replacing groups of user {}: {:?}", user_id, group_ids);
        let mut tables = self.tables.write();
        ensure_known(&tables.users, ReferenceKind::User, [user_id])?;
        ensure_known(&tables.groups, ReferenceKind::UserGroup, group_ids.iter().copied())?;
        replace_by_left(&mut tables.user_groups, user_id, group_ids);
        Ok(())
    }

    async fn users_in_group(&self, group_id: UserGroupId) -> Result<BTreeSet<UserId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(lefts_of(&tables.user_groups, group_id))
    }

    async fn set_group_users(&self, group_id: UserGroupId, user_ids: &[UserId]) -> Result<()> {
        self.check_online()?;
        debug!("Replacing members of group {}: {:?}", group_id, user_ids);
        let mut tables = self.tables.write();
        ensure_known(&tables.groups, ReferenceKind::UserGroup, [group_id])?;
        ensure_known(&tables.users, ReferenceKind::User, user_ids.iter().copied())?;
        replace_by_right(&mut tables.user_groups, group_id, user_ids);
        Ok(())
    }
}

#[async_trait]
impl GroupRoleStore for MemoryStore {
    async fn roles_for_groups(&self, group_ids: &BTreeSet<UserGroupId>) -> Result<BTreeSet<RoleId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(tables
            .role_groups
            .iter()
            .filter(|(_, group_id)| group_ids.contains(group_id))
            .map(|(role_id, _)| *role_id)
            .collect())
    }

    async fn set_group_roles(&self, group_id: UserGroupId, role_ids: &[RoleId]) -> Result<()> {
        self.check_online()?;
        debug!("Replacing roles of group {}: {:?}", group_id, role_ids);
        let mut tables = self.tables.write();
        ensure_known(&tables.groups, ReferenceKind::UserGroup, [group_id])?;
        ensure_known(&tables.roles, ReferenceKind::Role, role_ids.iter().copied())?;
        replace_by_right(&mut tables.role_groups, group_id, role_ids);
        Ok(())
    }

    async fn groups_for_role(&self, role_id: RoleId) -> Result<BTreeSet<UserGroupId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(rights_of(&tables.role_groups, role_id))
    }

    async fn set_role_groups(&self, role_id: RoleId, group_ids: &[UserGroupId]) -> Result<()> {
        self.check_online()?;
        debug!("Replacing groups of role {}: {:?}", role_id, group_ids);
        let mut tables = self.tables.write();
        ensure_known(&tables.roles, ReferenceKind::Role, [role_id])?;
        ensure_known(&tables.groups, ReferenceKind::UserGroup, group_ids.iter().copied())?;
        replace_by_left(&mut tables.role_groups, role_id, group_ids);
        Ok(())
    }
}

#[async_trait]
impl RolePowerStore for MemoryStore {
    async fn powers_for_roles(&self, role_ids: &BTreeSet<RoleId>) -> Result<BTreeSet<PowerId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(tables
            .role_powers
            .iter()
            .filter(|(role_id, _)| role_ids.contains(role_id))
            .map(|(_, power_id)| *power_id)
            .collect())
    }

    async fn set_role_powers(&self, role_id: RoleId, power_ids: &[PowerId]) -> Result<()> {
        self.check_online()?;
        debug!("Replacing powers of role {}: {:?}", role_id, power_ids);
        let mut tables = self.tables.write();
        ensure_known(&tables.roles, ReferenceKind::Role, [role_id])?;
        ensure_known(&tables.powers, ReferenceKind::Power, power_ids.iter().copied())?;
        replace_by_left(&mut tables.role_powers, role_id, power_ids);
        Ok(())
    }

    async fn roles_for_power(&self, power_id: PowerId) -> Result<BTreeSet<RoleId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(lefts_of(&tables.role_powers, power_id))
    }

    async fn set_power_roles(&self, power_id: PowerId, role_ids: &[RoleId]) -> Result<()> {
        self.check_online()?;
        debug!("Replacing roles holding power {}: {:?}", power_id, role_ids);
        let mut tables = self.tables.write();
        ensure_known(&tables.powers, ReferenceKind::Power, [power_id])?;
        ensure_known(&tables.roles, ReferenceKind::Role, role_ids.iter().copied())?;
        replace_by_right(&mut tables.role_powers, power_id, role_ids);
        Ok(())
    }
}

#[async_trait]
impl PowerStore for MemoryStore {
    async fn powers_by_ids(&self, power_ids: &BTreeSet<PowerId>) -> Result<Vec<Power>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(power_ids
            .iter()
            .filter_map(|power_id| tables.powers.get(power_id).cloned())
            .collect())
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn roles_by_ids(&self, role_ids: &BTreeSet<RoleId>) -> Result<Vec<Role>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(role_ids
            .iter()
            .filter_map(|role_id| tables.roles.get(role_id).cloned())
            .collect())
    }

    async fn user_groups_by_ids(
        &self,
        group_ids: &BTreeSet<UserGroupId>,
    ) -> Result<Vec<UserGroup>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(group_ids
            .iter()
            .filter_map(|group_id| tables.groups.get(group_id).cloned())
            .collect())
    }
}

#[async_trait]
impl PowerResourceStore for MemoryStore {
    async fn powers_for_resource(&self, resource_id: ResourceId) -> Result<BTreeSet<PowerId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(lefts_of(&tables.power_resources, resource_id))
    }

    async fn resources_for_power(&self, power_id: PowerId) -> Result<BTreeSet<ResourceId>> {
        self.check_online()?;
        let tables = self.tables.read();
        Ok(rights_of(&tables.power_resources, power_id))
    }

    async fn set_resource_powers(
        &self,
        resource_id: ResourceId,
        power_ids: &[PowerId],
    ) -> Result<()> {
        self.check_online()?;
        let mut tables = self.tables.write();
        ensure_known(&tables.resources, ReferenceKind::Resource, [resource_id])?;
        ensure_known(&tables.powers, ReferenceKind::Power, power_ids.iter().copied())?;
        replace_by_right(&mut tables.power_resources, resource_id, power_ids);
        Ok(())
    }

    async fn set_power_resources(
        &self,
        power_id: PowerId,
        resource_ids: &[ResourceId],
    ) -> Result<()> {
        self.check_online()?;
        let mut tables = self.tables.write();
        ensure_known(&tables.powers, ReferenceKind::Power, [power_id])?;
        ensure_known(&tables.resources, ReferenceKind::Resource, resource_ids.iter().copied())?;
        replace_by_left(&mut tables.power_resources, power_id, resource_ids);
        Ok(())
    }
}
