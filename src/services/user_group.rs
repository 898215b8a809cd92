//! User group administration

use super::{ensure_enabled, ensure_not_blank};
use crate::core::models::{
    EntityState, NewUserGroup, Page, PageQuery, RoleId, StateChange, UserGroup, UserGroupDetail,
    UserGroupFilter, UserGroupId, UserGroupUpdate, UserId,
};
use crate::core::stores::{GroupMembershipStore, GroupRoleStore};
use crate::storage::database::Database;
use crate::utils::error::{RbacError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// User group CRUD, membership and group grants
#[derive(Debug, Clone)]
pub struct UserGroupService {
    db: Arc<Database>,
}

impl UserGroupService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewUserGroup, operator: Option<&str>) -> Result<UserGroup> {
        ensure_not_blank(&input.name, "User group name")?;
        if self.db.find_user_group_by_name(&input.name).await?.is_some() {
            return Err(RbacError::conflict(format!(
                "User group name already exists: {}",
                input.name
            )));
        }

        let group = self.db.create_user_group(&input, operator).await?;
        info!("User group created: {} ({})", group.name, group.id);
        Ok(group)
    }

    pub async fn find_all(
        &self,
        filter: &UserGroupFilter,
        query: PageQuery,
    ) -> Result<Page<UserGroup>> {
        self.db.list_user_groups(filter, query).await
    }

    /// Group with its member ids and granted role ids
    pub async fn find_one(&self, group_id: UserGroupId) -> Result<UserGroupDetail> {
        let group = self.get(group_id).await?;
        ensure_enabled(group.state, "User group")?;

        let group_ids = BTreeSet::from([group_id]);
        let (user_ids, role_ids) = futures::try_join!(
            self.db.users_in_group(group_id),
            self.db.roles_for_groups(&group_ids),
        )?;
        Ok(UserGroupDetail {
            group,
            user_ids,
            role_ids,
        })
    }

    pub async fn update(
        &self,
        group_id: UserGroupId,
        input: UserGroupUpdate,
        operator: Option<&str>,
    ) -> Result<UserGroup> {
        let group = self.get(group_id).await?;
        ensure_enabled(group.state, "User group")?;

        if let Some(name) = &input.name {
            ensure_not_blank(name, "User group name")?;
            if let Some(existing) = self.db.find_user_group_by_name(name).await? {
                if existing.id != group_id {
                    return Err(RbacError::conflict(format!(
                        "User group name already exists: {}",
                        name
                    )));
                }
            }
        }

        self.db.update_user_group(group_id, &input, operator).await
    }

    pub async fn enable(&self, group_id: UserGroupId) -> Result<StateChange> {
        self.switch(group_id, EntityState::Enabled).await
    }

    pub async fn disable(&self, group_id: UserGroupId) -> Result<StateChange> {
        self.switch(group_id, EntityState::Disabled).await
    }

    pub async fn delete(&self, group_id: UserGroupId) -> Result<()> {
        self.db.delete_user_group(group_id).await?;
        info!("User group deleted: {}", group_id);
        Ok(())
    }

    pub async fn set_users(&self, group_id: UserGroupId, user_ids: &[UserId]) -> Result<()> {
        ensure_enabled(self.get(group_id).await?.state, "User group")?;
        self.db.set_group_users(group_id, user_ids).await?;
        info!("User group {} now has {} members", group_id, user_ids.len());
        Ok(())
    }

    pub async fn set_roles(&self, group_id: UserGroupId, role_ids: &[RoleId]) -> Result<()> {
        ensure_enabled(self.get(group_id).await?.state, "User group")?;
        self.db.set_group_roles(group_id, role_ids).await?;
        info!("User group {} now holds {} roles", group_id, role_ids.len());
        Ok(())
    }

    async fn get(&self, group_id: UserGroupId) -> Result<UserGroup> {
        self.db
            .find_user_group_by_id(group_id)
            .await?
            .ok_or_else(|| RbacError::not_found(format!("User group not found: {}", group_id)))
    }

    async fn switch(&self, group_id: UserGroupId, target: EntityState) -> Result<StateChange> {
        let group = self.get(group_id).await?;
        let change = StateChange::between(group.state, target);
        if change == StateChange::Changed {
            self.db.set_user_group_state(group_id, target).await?;
            info!("User group {} is now {:?}", group_id, target);
        }
        Ok(change)
    }
}
