//! Lookup store implementations over the join tables

use crate::core::models::{
    Power, PowerId, ResourceId, Role, RoleId, UserGroup, UserGroupId, UserId,
};
use crate::core::stores::{
    DirectoryStore, GroupMembershipStore, GroupRoleStore, PowerResourceStore, PowerStore, RoleAssignmentStore,
    RolePowerStore,
};
use crate::utils::error::{RbacError, ReferenceKind, Result};
use async_trait::async_trait;
use sea_orm::*;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::super::entities::{
    self, power, power_resource, resource, role, role_power, role_user, role_user_group, user,
    user_group, user_user_group,
};
use super::links;
use super::types::SeaOrmDatabase;

fn typed<T: From<i32> + Ord>(ids: BTreeSet<i32>) -> BTreeSet<T> {
    ids.into_iter().map(T::from).collect()
}

#[async_trait]
impl RoleAssignmentStore for SeaOrmDatabase {
    async fn roles_for_user(&self, user_id: UserId) -> Result<BTreeSet<RoleId>> {
        debug!("Finding roles for user: {}", user_id);

        let ids = links::linked::<entities::RoleUser, _>(
            &self.db,
            role_user::Column::UserId,
            vec![user_id.get()],
            role_user::Column::RoleId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn roles_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, BTreeSet<RoleId>>> {
        debug!("Finding roles for {} users", user_ids.len());

        let mut roles: HashMap<UserId, BTreeSet<RoleId>> =
            user_ids.iter().map(|id| (*id, BTreeSet::new())).collect();
        if user_ids.is_empty() {
            return Ok(roles);
        }

        let rows = entities::RoleUser::find()
            .filter(role_user::Column::UserId.is_in(links::distinct(user_ids)))
            .all(&self.db)
            .await
            .map_err(RbacError::Database)?;

        for row in rows {
            roles
                .entry(UserId(row.user_id))
                .or_default()
                .insert(RoleId(row.role_id));
        }
        Ok(roles)
    }

    async fn set_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<()> {
        debug!("Replacing roles of user {}: {:?}", user_id, role_ids);

        let owner = user_id.get();
        links::rebind::<entities::User, entities::Role, entities::RoleUser, _, _>(
            &self.db,
            user::Column::Id,
            ReferenceKind::User,
            owner,
            role::Column::Id,
            ReferenceKind::Role,
            links::distinct(role_ids),
            role_user::Column::UserId,
            |role_id| role_user::ActiveModel {
                role_id: Set(role_id),
                user_id: Set(owner),
                ..Default::default()
            },
        )
        .await
    }

    async fn users_for_role(&self, role_id: RoleId) -> Result<BTreeSet<UserId>> {
        debug!("Finding users of role: {}", role_id);

        let ids = links::linked::<entities::RoleUser, _>(
            &self.db,
            role_user::Column::RoleId,
            vec![role_id.get()],
            role_user::Column::UserId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn set_role_users(&self, role_id: RoleId, user_ids: &[UserId]) -> Result<()> {
        debug!("Replacing users of role {}: {:?}", role_id, user_ids);

        let owner = role_id.get();
        links::rebind::<entities::Role, entities::User, entities::RoleUser, _, _>(
            &self.db,
            role::Column::Id,
            ReferenceKind::Role,
            owner,
            user::Column::Id,
            ReferenceKind::User,
            links::distinct(user_ids),
            role_user::Column::RoleId,
            |user_id| role_user::ActiveModel {
                role_id: Set(owner),
                user_id: Set(user_id),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl GroupMembershipStore for SeaOrmDatabase {
    async fn groups_for_user(&self, user_id: UserId) -> Result<BTreeSet<UserGroupId>> {
        debug!("Finding groups of user: {}", user_id);

        let ids = links::linked::<entities::UserUserGroup, _>(
            &self.db,
            user_user_group::Column::UserId,
            vec![user_id.get()],
            user_user_group::Column::UserGroupId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn set_user_groups(&self, user_id: UserId, group_ids: &[UserGroupId]) -> Result<()> {
        debug!("Replacing groups of user {}: {:?}", user_id, group_ids);

        let owner = user_id.get();
        links::rebind::<entities::User, entities::UserGroup, entities::UserUserGroup, _, _>(
            &self.db,
            user::Column::Id,
            ReferenceKind::User,
            owner,
            user_group::Column::Id,
            ReferenceKind::UserGroup,
            links::distinct(group_ids),
            user_user_group::Column::UserId,
            |group_id| user_user_group::ActiveModel {
                user_id: Set(owner),
                user_group_id: Set(group_id),
                ..Default::default()
            },
        )
        .await
    }

    async fn users_in_group(&self, group_id: UserGroupId) -> Result<BTreeSet<UserId>> {
        debug!("Finding members of group: {}", group_id);

        let ids = links::linked::<entities::UserUserGroup, _>(
            &self.db,
            user_user_group::Column::UserGroupId,
            vec![group_id.get()],
            user_user_group::Column::UserId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn set_group_users(&self, group_id: UserGroupId, user_ids: &[UserId]) -> Result<()> {
        debug!("Replacing members of group {}: {:?}", group_id, user_ids);

        let owner = group_id.get();
        links::rebind::<entities::UserGroup, entities::User, entities::UserUserGroup, _, _>(
            &self.db,
            user_group::Column::Id,
            ReferenceKind::UserGroup,
            owner,
            user::Column::Id,
            ReferenceKind::User,
            links::distinct(user_ids),
            user_user_group::Column::UserGroupId,
            |user_id| user_user_group::ActiveModel {
                user_id: Set(user_id),
                user_group_id: Set(owner),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl GroupRoleStore for SeaOrmDatabase {
    async fn roles_for_groups(&self, group_ids: &BTreeSet<UserGroupId>) -> Result<BTreeSet<RoleId>> {
        debug!("Finding roles for groups: {:?}", group_ids);

        let ids = links::linked::<entities::RoleUserGroup, _>(
            &self.db,
            role_user_group::Column::UserGroupId,
            group_ids.iter().map(|id| id.get()).collect(),
            role_user_group::Column::RoleId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn set_group_roles(&self, group_id: UserGroupId, role_ids: &[RoleId]) -> Result<()> {
        debug!("Replacing roles of group {}: {:?}", group_id, role_ids);

        let owner = group_id.get();
        links::rebind::<entities::UserGroup, entities::Role, entities::RoleUserGroup, _, _>(
            &self.db,
            user_group::Column::Id,
            ReferenceKind::UserGroup,
            owner,
            role::Column::Id,
            ReferenceKind::Role,
            links::distinct(role_ids),
            role_user_group::Column::UserGroupId,
            |role_id| role_user_group::ActiveModel {
                role_id: Set(role_id),
                user_group_id: Set(owner),
                ..Default::default()
            },
        )
        .await
    }

    async fn groups_for_role(&self, role_id: RoleId) -> Result<BTreeSet<UserGroupId>> {
        debug!("Finding groups holding role: {}", role_id);

        let ids = links::linked::<entities::RoleUserGroup, _>(
            &self.db,
            role_user_group::Column::RoleId,
            vec![role_id.get()],
            role_user_group::Column::UserGroupId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn set_role_groups(&self, role_id: RoleId, group_ids: &[UserGroupId]) -> Result<()> {
        debug!("Replacing groups holding role {}: {:?}", role_id, group_ids);

        let owner = role_id.get();
        links::rebind::<entities::Role, entities::UserGroup, entities::RoleUserGroup, _, _>(
            &self.db,
            role::Column::Id,
            ReferenceKind::Role,
            owner,
            user_group::Column::Id,
            ReferenceKind::UserGroup,
            links::distinct(group_ids),
            role_user_group::Column::RoleId,
            |group_id| role_user_group::ActiveModel {
                role_id: Set(owner),
                user_group_id: Set(group_id),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl RolePowerStore for SeaOrmDatabase {
    async fn powers_for_roles(&self, role_ids: &BTreeSet<RoleId>) -> Result<BTreeSet<PowerId>> {
        debug!("Finding powers for roles: {:?}", role_ids);

        let ids = links::linked::<entities::RolePower, _>(
            &self.db,
            role_power::Column::RoleId,
            role_ids.iter().map(|id| id.get()).collect(),
            role_power::Column::PowerId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn set_role_powers(&self, role_id: RoleId, power_ids: &[PowerId]) -> Result<()> {
        debug!("Replacing powers of role {}: {:?}", role_id, power_ids);

        let owner = role_id.get();
        links::rebind::<entities::Role, entities::Power, entities::RolePower, _, _>(
            &self.db,
            role::Column::Id,
            ReferenceKind::Role,
            owner,
            power::Column::Id,
            ReferenceKind::Power,
            links::distinct(power_ids),
            role_power::Column::RoleId,
            |power_id| role_power::ActiveModel {
                role_id: Set(owner),
                power_id: Set(power_id),
                ..Default::default()
            },
        )
        .await
    }

    async fn roles_for_power(&self, power_id: PowerId) -> Result<BTreeSet<RoleId>> {
        debug!("Finding roles holding power: {}", power_id);

        let ids = links::linked::<entities::RolePower, _>(
            &self.db,
            role_power::Column::PowerId,
            vec![power_id.get()],
            role_power::Column::RoleId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn set_power_roles(&self, power_id: PowerId, role_ids: &[RoleId]) -> Result<()> {
        debug!("Replacing roles holding power {}: {:?}", power_id, role_ids);

        let owner = power_id.get();
        links::rebind::<entities::Power, entities::Role, entities::RolePower, _, _>(
            &self.db,
            power::Column::Id,
            ReferenceKind::Power,
            owner,
            role::Column::Id,
            ReferenceKind::Role,
            links::distinct(role_ids),
            role_power::Column::PowerId,
            |role_id| role_power::ActiveModel {
                role_id: Set(role_id),
                power_id: Set(owner),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl PowerStore for SeaOrmDatabase {
    async fn powers_by_ids(&self, power_ids: &BTreeSet<PowerId>) -> Result<Vec<Power>> {
        debug!("Loading {} powers", power_ids.len());

        if power_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entities::Power::find()
            .filter(power::Column::Id.is_in(power_ids.iter().map(|id| id.get())))
            .order_by_asc(power::Column::Id)
            .all(&self.db)
            .await
            .map_err(RbacError::Database)?;

        models.iter().map(power::Model::to_domain).collect()
    }
}

#[async_trait]
impl DirectoryStore for SeaOrmDatabase {
    async fn roles_by_ids(&self, role_ids: &BTreeSet<RoleId>) -> Result<Vec<Role>> {
        debug!("Loading {} roles", role_ids.len());

        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entities::Role::find()
            .filter(role::Column::Id.is_in(role_ids.iter().map(|id| id.get())))
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(models.iter().map(role::Model::to_domain).collect())
    }

    async fn user_groups_by_ids(
        &self,
        group_ids: &BTreeSet<UserGroupId>,
    ) -> Result<Vec<UserGroup>> {
        debug!("Loading {} user groups", group_ids.len());

        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entities::UserGroup::find()
            .filter(user_group::Column::Id.is_in(group_ids.iter().map(|id| id.get())))
            .order_by_asc(user_group::Column::Id)
            .all(&self.db)
            .await
            .map_err(RbacError::Database)?;

        Ok(models.iter().map(user_group::Model::to_domain).collect())
    }
}

#[async_trait]
impl PowerResourceStore for SeaOrmDatabase {
    async fn powers_for_resource(&self, resource_id: ResourceId) -> Result<BTreeSet<PowerId>> {
        debug!("Finding powers guarding resource: {}", resource_id);

        let ids = links::linked::<entities::PowerResource, _>(
            &self.db,
            power_resource::Column::ResourceId,
            vec![resource_id.get()],
            power_resource::Column::PowerId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn resources_for_power(&self, power_id: PowerId) -> Result<BTreeSet<ResourceId>> {
        debug!("Finding resources guarded by power: {}", power_id);

        let ids = links::linked::<entities::PowerResource, _>(
            &self.db,
            power_resource::Column::PowerId,
            vec![power_id.get()],
            power_resource::Column::ResourceId,
        )
        .await?;
        Ok(typed(ids))
    }

    async fn set_resource_powers(
        &self,
        resource_id: ResourceId,
        power_ids: &[PowerId],
    ) -> Result<()> {
        debug!("Replacing powers of resource {}: {:?}", resource_id, power_ids);

        let owner = resource_id.get();
        links::rebind::<entities::Resource, entities::Power, entities::PowerResource, _, _>(
            &self.db,
            resource::Column::Id,
            ReferenceKind::Resource,
            owner,
            power::Column::Id,
            ReferenceKind::Power,
            links::distinct(power_ids),
            power_resource::Column::ResourceId,
            |power_id| power_resource::ActiveModel {
                power_id: Set(power_id),
                resource_id: Set(owner),
                ..Default::default()
            },
        )
        .await
    }

    async fn set_power_resources(
        &self,
        power_id: PowerId,
        resource_ids: &[ResourceId],
    ) -> Result<()> {
        debug!("Replacing resources of power {}: {:?}", power_id, resource_ids);

        let owner = power_id.get();
        links::rebind::<entities::Power, entities::Resource, entities::PowerResource, _, _>(
            &self.db,
            power::Column::Id,
            ReferenceKind::Power,
            owner,
            resource::Column::Id,
            ReferenceKind::Resource,
            links::distinct(resource_ids),
            power_resource::Column::PowerId,
            |resource_id| power_resource::ActiveModel {
                power_id: Set(owner),
                resource_id: Set(resource_id),
                ..Default::default()
            },
        )
        .await
    }
}
