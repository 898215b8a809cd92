//! Seed data for integration tests

use rbac_admin::core::models::{
    NewPower, NewResource, NewRole, NewUserGroup, Power, PowerAction, PowerId, ResourceId,
    RoleId, UserGroupId, UserId,
};
use rbac_admin::core::stores::{GroupMembershipStore, GroupRoleStore, RoleAssignmentStore, RolePowerStore};
use rbac_admin::storage::database::{Database, NewUserRecord};
use rbac_admin::utils::auth::hash_password;

/// Password every fixture user is created with
pub const PASSWORD: &str = "fixture-pw";

pub async fn user(db: &Database, username: &str) -> UserId {
    db.create_user(NewUserRecord {
        username: username.to_string(),
        password_hash: hash_password(PASSWORD).expect("hash"),
        name: Some(username.to_uppercase()),
        ..Default::default()
    })
    .await
    .expect("create user")
    .id
}

pub async fn role(db: &Database, name: &str) -> RoleId {
    db.create_role(
        &NewRole {
            name: name.to_string(),
            parent_id: None,
            description: None,
        },
        Some("fixtures"),
    )
    .await
    .expect("create role")
    .id
}

pub async fn group(db: &Database, name: &str) -> UserGroupId {
    db.create_user_group(
        &NewUserGroup {
            name: name.to_string(),
            description: None,
        },
        Some("fixtures"),
    )
    .await
    .expect("create group")
    .id
}

pub async fn power(db: &Database, resource_key: &str, action: PowerAction) -> PowerId {
    db.create_power(
        &NewPower {
            resource_key: resource_key.to_string(),
            action,
            name: format!("{} {}", action, resource_key),
            description: None,
        },
        Some("fixtures"),
    )
    .await
    .expect("create power")
    .id
}

pub async fn resource(db: &Database, key: &str) -> ResourceId {
    db.create_resource(
        &NewResource {
            key: key.to_string(),
            name: key.to_string(),
            description: None,
        },
        Some("fixtures"),
    )
    .await
    .expect("create resource")
    .id
}

/// U1 holds R1 directly and belongs to G1; G1 holds R2; R1 grants P1 and R2
/// grants P2
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub user: UserId,
    pub direct_role: RoleId,
    pub group: UserGroupId,
    pub group_role: RoleId,
    pub direct_power: PowerId,
    pub group_power: PowerId,
}

impl Scenario {
    pub async fn seed(db: &Database) -> Self {
        let user = user(db, "u1").await;
        let direct_role = role(db, "r1").await;
        let group_role = role(db, "r2").await;
        let group = group(db, "g1").await;
        let direct_power = power(db, "user", PowerAction::View).await;
        let group_power = power(db, "role", PowerAction::Update).await;

        db.set_user_roles(user, &[direct_role]).await.expect("user roles");
        db.set_user_groups(user, &[group]).await.expect("user groups");
        db.set_group_roles(group, &[group_role]).await.expect("group roles");
        db.set_role_powers(direct_role, &[direct_power])
            .await
            .expect("direct role powers");
        db.set_role_powers(group_role, &[group_power])
            .await
            .expect("group role powers");

        Self {
            user,
            direct_role,
            group,
            group_role,
            direct_power,
            group_power,
        }
    }

    /// Both powers, ordered by id
    pub fn expected_powers(&self) -> Vec<PowerId> {
        let mut ids = vec![self.direct_power, self.group_power];
        ids.sort();
        ids
    }
}

pub fn power_ids(powers: &[Power]) -> Vec<PowerId> {
    powers.iter().map(|power| power.id).collect()
}
