//! Role administration

use super::{ensure_enabled, ensure_not_blank};
use crate::core::models::{
    EntityState, NewRole, Page, PageQuery, PowerId, Role, RoleDetail, RoleFilter, RoleId,
    RoleUpdate, StateChange, UserGroupId, UserId,
};
use crate::core::stores::{GroupRoleStore, RoleAssignmentStore, RolePowerStore};
use crate::storage::database::Database;
use crate::utils::error::{RbacError, ReferenceKind, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Role CRUD and the grants rooted at a role
#[derive(Debug, Clone)]
pub struct RoleService {
    db: Arc<Database>,
}

impl RoleService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewRole, operator: Option<&str>) -> Result<Role> {
        ensure_not_blank(&input.name, "Role name")?;
        if self.db.find_role_by_name(&input.name).await?.is_some() {
            return Err(RbacError::conflict(format!(
                "Role name already exists: {}",
                input.name
            )));
        }
        if let Some(parent_id) = input.parent_id {
            self.ensure_parent(parent_id).await?;
        }

        let role = self.db.create_role(&input, operator).await?;
        info!("Role created: {} ({})", role.name, role.id);
        Ok(role)
    }

    pub async fn find_all(&self, filter: &RoleFilter, query: PageQuery) -> Result<Page<Role>> {
        self.db.list_roles(filter, query).await
    }

    /// Role with the ids of the powers granted to it
    pub async fn find_one(&self, role_id: RoleId) -> Result<RoleDetail> {
        let role = self.get(role_id).await?;
        ensure_enabled(role.state, "Role")?;

        let power_ids = self.db.powers_for_roles(&BTreeSet::from([role_id])).await?;
        Ok(RoleDetail { role, power_ids })
    }

    pub async fn update(
        &self,
        role_id: RoleId,
        input: RoleUpdate,
        operator: Option<&str>,
    ) -> Result<Role> {
        let role = self.get(role_id).await?;
        ensure_enabled(role.state, "Role")?;

        if let Some(name) = &input.name {
            ensure_not_blank(name, "Role name")?;
            if let Some(existing) = self.db.find_role_by_name(name).await? {
                if existing.id != role_id {
                    return Err(RbacError::conflict(format!(
                        "Role name already exists: {}",
                        name
                    )));
                }
            }
        }
        if let Some(parent_id) = input.parent_id {
            if parent_id == role_id {
                return Err(RbacError::validation("A role cannot be its own parent"));
            }
            self.ensure_parent(parent_id).await?;
        }

        self.db.update_role(role_id, &input, operator).await
    }

    pub async fn enable(&self, role_id: RoleId) -> Result<StateChange> {
        self.switch(role_id, EntityState::Enabled).await
    }

    pub async fn disable(&self, role_id: RoleId) -> Result<StateChange> {
        self.switch(role_id, EntityState::Disabled).await
    }

    /// Hard delete; grant rows go in the same transaction
    pub async fn delete(&self, role_id: RoleId) -> Result<()> {
        self.db.delete_role(role_id).await?;
        info!("Role deleted: {}", role_id);
        Ok(())
    }

    pub async fn set_powers(&self, role_id: RoleId, power_ids: &[PowerId]) -> Result<()> {
        ensure_enabled(self.get(role_id).await?.state, "Role")?;
        self.db.set_role_powers(role_id, power_ids).await?;
        info!("Role {} now grants {} powers", role_id, power_ids.len());
        Ok(())
    }

    pub async fn set_users(&self, role_id: RoleId, user_ids: &[UserId]) -> Result<()> {
        ensure_enabled(self.get(role_id).await?.state, "Role")?;
        self.db.set_role_users(role_id, user_ids).await?;
        info!("Role {} assigned to {} users", role_id, user_ids.len());
        Ok(())
    }

    pub async fn set_groups(&self, role_id: RoleId, group_ids: &[UserGroupId]) -> Result<()> {
        ensure_enabled(self.get(role_id).await?.state, "Role")?;
        self.db.set_role_groups(role_id, group_ids).await?;
        info!("Role {} granted to {} groups", role_id, group_ids.len());
        Ok(())
    }

    async fn get(&self, role_id: RoleId) -> Result<Role> {
        self.db
            .find_role_by_id(role_id)
            .await?
            .ok_or_else(|| RbacError::not_found(format!("Role not found: {}", role_id)))
    }

    async fn ensure_parent(&self, parent_id: RoleId) -> Result<()> {
        match self.db.find_role_by_id(parent_id).await? {
            Some(_) => Ok(()),
            None => Err(RbacError::invalid_reference(
                ReferenceKind::Role,
                [parent_id.get()],
            )),
        }
    }

    async fn switch(&self, role_id: RoleId, target: EntityState) -> Result<StateChange> {
        let role = self.get(role_id).await?;
        let change = StateChange::between(role.state, target);
        if change == StateChange::Changed {
            self.db.set_role_state(role_id, target).await?;
            info!("Role {} is now {:?}", role_id, target);
        }
        Ok(change)
    }
}
