//! Entity services, registration and login over the SQLite backend

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use crate::common::fixtures::{self, PASSWORD, Scenario};
    use rbac_admin::config::{Config, ResolverConfig};
    use rbac_admin::core::models::{
        EntityState, NewPower, NewResource, NewRole, NewUser, NewUserGroup, PageQuery,
        PowerAction, PowerFilter, RoleFilter, RoleId, RoleUpdate, StateChange, UserFilter,
        UserGroupUpdate, UserId, UserUpdate,
    };
    use rbac_admin::core::resolver::PermissionResolver;
    use rbac_admin::services::ProfileService;
    use rbac_admin::storage::MemoryStore;
    use rbac_admin::utils::error::{ErrorKind, RbacError, ReferenceKind};
    use crate::{assert_err, assert_ok};
    use rbac_admin::AuthSystem;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn new_role(name: &str) -> NewRole {
        NewRole {
            name: name.to_string(),
            parent_id: None,
            description: None,
        }
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "long-enough".to_string(),
            name: None,
            email: Some(format!("{}@example.com", username)),
            phone: None,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_role_name_must_be_unique() {
        let db = TestDatabase::new().await;
        let admin = db.admin();

        assert_ok!(admin.roles().create(new_role("auditor"), Some("root")).await);
        let err = assert_err!(admin.roles().create(new_role("auditor"), None).await);
        assert!(matches!(err, RbacError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_role_parent_must_exist_and_differ() {
        let db = TestDatabase::new().await;
        let admin = db.admin();

        let err = admin
            .roles()
            .create(
                NewRole {
                    parent_id: Some(RoleId(99)),
                    ..new_role("child")
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RbacError::InvalidReference {
                kind: ReferenceKind::Role,
                ..
            }
        ));

        let role = admin.roles().create(new_role("solo"), None).await.unwrap();
        let err = admin
            .roles()
            .update(
                role.id,
                RoleUpdate {
                    parent_id: Some(role.id),
                    ..RoleUpdate::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::Validation(_)));
    }

    #[tokio::test]
    async fn test_role_audit_columns() {
        let db = TestDatabase::new().await;
        let admin = db.admin();

        let role = admin.roles().create(new_role("ops"), Some("root")).await.unwrap();
        assert_eq!(role.audit.created_by.as_deref(), Some("root"));

        let updated = admin
            .roles()
            .update(
                role.id,
                RoleUpdate {
                    description: Some("operations".to_string()),
                    ..RoleUpdate::default()
                },
                Some("deputy"),
            )
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("operations"));
        assert_eq!(updated.audit.created_by.as_deref(), Some("root"));
        assert_eq!(updated.audit.updated_by.as_deref(), Some("deputy"));
    }

    #[tokio::test]
    async fn test_role_find_one_carries_power_ids() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let admin = db.admin();

        let detail = admin.roles().find_one(scenario.group_role).await.unwrap();
        assert_eq!(detail.role.name, "r2");
        assert_eq!(detail.power_ids, BTreeSet::from([scenario.group_power]));
    }

    #[tokio::test]
    async fn test_enable_disable_report_state_change() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let roles = db.admin().roles().clone();

        assert_eq!(
            roles.enable(scenario.direct_role).await.unwrap(),
            StateChange::Unchanged
        );
        assert_eq!(
            roles.disable(scenario.direct_role).await.unwrap(),
            StateChange::Changed
        );
        assert_eq!(
            roles.disable(scenario.direct_role).await.unwrap(),
            StateChange::Unchanged
        );

        let err = roles.find_one(scenario.direct_role).await.unwrap_err();
        assert!(matches!(err, RbacError::Disabled(_)));

        assert_eq!(
            roles.enable(scenario.direct_role).await.unwrap(),
            StateChange::Changed
        );
        assert!(roles.find_one(scenario.direct_role).await.is_ok());
    }

    #[tokio::test]
    async fn test_role_pages_are_newest_first() {
        let db = TestDatabase::new().await;
        let admin = db.admin();
        for name in ["alpha", "beta", "gamma"] {
            admin.roles().create(new_role(name), None).await.unwrap();
        }

        let page = admin
            .roles()
            .find_all(&RoleFilter::default(), PageQuery::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].name, "gamma");

        let page = admin
            .roles()
            .find_all(&RoleFilter::default(), PageQuery::new(2, 2))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "alpha");

        let filtered = admin
            .roles()
            .find_all(
                &RoleFilter {
                    name: Some("et".to_string()),
                    ..RoleFilter::default()
                },
                PageQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(filtered.total, 1);
        assert_eq!(filtered.data[0].name, "beta");
    }

    #[tokio::test]
    async fn test_group_detail_and_rename_conflict() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let admin = db.admin();

        let detail = admin.groups().find_one(scenario.group).await.unwrap();
        assert_eq!(detail.user_ids, BTreeSet::from([scenario.user]));
        assert_eq!(detail.role_ids, BTreeSet::from([scenario.group_role]));

        admin
            .groups()
            .create(
                NewUserGroup {
                    name: "g2".to_string(),
                    description: None,
                },
                None,
            )
            .await
            .unwrap();
        let err = admin
            .groups()
            .update(
                scenario.group,
                UserGroupUpdate {
                    name: Some("g2".to_string()),
                    description: None,
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_group_grants_flow_into_member_profiles() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let admin = db.admin();
        let extra = fixtures::role(db.db(), "extra").await;
        let extra_power = fixtures::power(db.db(), "power", PowerAction::Delete).await;

        admin.roles().set_powers(extra, &[extra_power]).await.unwrap();
        admin
            .groups()
            .set_roles(scenario.group, &[scenario.group_role, extra])
            .await
            .unwrap();

        let profile = admin.users().find_one(scenario.user).await.unwrap();
        let ids: Vec<_> = profile.powers.iter().map(|power| power.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&extra_power));
        assert_eq!(
            profile.user_group_role_ids,
            BTreeSet::from([scenario.group_role, extra])
        );
    }

    #[tokio::test]
    async fn test_profile_carries_role_and_group_records() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let admin = db.admin();

        let profile = admin.users().find_one(scenario.user).await.unwrap();
        let role_ids: Vec<_> = profile.roles.iter().map(|role| role.id).collect();
        assert_eq!(role_ids, vec![scenario.direct_role, scenario.group_role]);
        assert_eq!(profile.groups.len(), 1);
        assert_eq!(profile.groups[0].id, scenario.group);
        assert_eq!(profile.groups[0].name, "g1");
    }

    #[tokio::test]
    async fn test_resource_key_unique_and_detail() {
        let db = TestDatabase::new().await;
        let admin = db.admin();
        let input = NewResource {
            key: "user".to_string(),
            name: "Users".to_string(),
            description: None,
        };

        let resource = admin.resources().create(input.clone(), None).await.unwrap();
        let err = admin.resources().create(input, None).await.unwrap_err();
        assert!(matches!(err, RbacError::Conflict(_)));

        let power = fixtures::power(db.db(), "user", PowerAction::Manage).await;
        admin
            .resources()
            .set_powers(resource.id, &[power])
            .await
            .unwrap();
        let detail = admin.resources().find_one(resource.id).await.unwrap();
        assert_eq!(detail.power_ids, BTreeSet::from([power]));
    }

    #[tokio::test]
    async fn test_power_filter_by_action() {
        let db = TestDatabase::new().await;
        let admin = db.admin();
        for action in PowerAction::ALL {
            admin
                .powers()
                .create(
                    NewPower {
                        resource_key: "role".to_string(),
                        action,
                        name: format!("{} role", action),
                        description: None,
                    },
                    None,
                )
                .await
                .unwrap();
        }

        let page = admin
            .powers()
            .find_all(
                &PowerFilter {
                    action: Some(PowerAction::Update),
                    ..PowerFilter::default()
                },
                PageQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].action, PowerAction::Update);
    }

    #[tokio::test]
    async fn test_register_and_login_share_one_profile() {
        let db = TestDatabase::new().await;
        let admin = db.admin();

        let user = admin.users().register(new_user("carol")).await.unwrap();
        assert_ne!(user.password_hash, "long-enough");

        let role = fixtures::role(db.db(), "reader").await;
        let power = fixtures::power(db.db(), "resource", PowerAction::View).await;
        admin.roles().set_powers(role, &[power]).await.unwrap();
        admin.users().set_roles(user.id, &[role]).await.unwrap();

        let login = admin.auth().login("carol", "long-enough").await.unwrap();
        let fetched = admin.users().find_one(user.id).await.unwrap();
        assert_eq!(login, fetched);
        assert_eq!(login.powers.len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_short_passwords() {
        let db = TestDatabase::new().await;
        let admin = db.admin();

        admin.users().register(new_user("dave")).await.unwrap();
        let err = admin.users().register(new_user("dave")).await.unwrap_err();
        assert!(matches!(err, RbacError::Conflict(_)));

        let err = admin
            .users()
            .register(NewUser {
                password: "123".to_string(),
                ..new_user("erin")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::Validation(_)));
    }

    #[tokio::test]
    async fn test_registration_can_be_switched_off() {
        let db = TestDatabase::new().await;
        let mut config = Config::default();
        config.app.auth.allow_registration = false;
        let admin = db.admin_with(config);

        let err = admin.users().register(new_user("frank")).await.unwrap_err();
        assert!(matches!(err, RbacError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_password_change_only_by_owner() {
        let db = TestDatabase::new().await;
        let admin = db.admin();
        let alice = fixtures::user(db.db(), "alice").await;
        let bob = fixtures::user(db.db(), "bob").await;

        let err = admin
            .users()
            .update_password(bob, alice, PASSWORD, "new-password")
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::Forbidden(_)));

        let err = admin
            .users()
            .update_password(alice, alice, "not-it", "new-password")
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::InvalidCredentials));

        admin
            .users()
            .update_password(alice, alice, PASSWORD, "new-password")
            .await
            .unwrap();
        assert!(admin.auth().login("alice", "new-password").await.is_ok());
        assert!(admin.auth().login("alice", PASSWORD).await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_user_cannot_be_granted_or_log_in() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let admin = db.admin();

        assert_eq!(
            admin.users().disable(scenario.user).await.unwrap(),
            StateChange::Changed
        );
        let err = admin
            .users()
            .set_roles(scenario.user, &[scenario.group_role])
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::Disabled(_)));
        let err = admin
            .users()
            .update(scenario.user, UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::Disabled(_)));

        let err = admin.auth().login("u1", PASSWORD).await.unwrap_err();
        assert!(matches!(err, RbacError::Disabled(_)));
    }

    #[tokio::test]
    async fn test_unknown_user_operations_are_not_found() {
        let db = TestDatabase::new().await;
        let admin = db.admin();

        let err = admin.users().find_one(UserId(314)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = admin.users().set_groups(UserId(314), &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_user_profile_update_and_listing() {
        let db = TestDatabase::new().await;
        let admin = db.admin();
        let alice = fixtures::user(db.db(), "alice").await;
        fixtures::user(db.db(), "bob").await;

        let updated = admin
            .users()
            .update(
                alice,
                UserUpdate {
                    phone: Some("555-0100".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.name.as_deref(), Some("ALICE"));

        let page = admin
            .users()
            .find_all(
                &UserFilter {
                    phone: Some("0100".to_string()),
                    ..UserFilter::default()
                },
                PageQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, alice);
    }

    #[tokio::test]
    async fn test_removed_user_loses_everything() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let admin = db.admin();

        admin.users().remove(scenario.user).await.unwrap();

        let err = admin.users().find_one(scenario.user).await.unwrap_err();
        assert!(matches!(err, RbacError::NotFound(_)));
        let detail = admin.groups().find_one(scenario.group).await.unwrap();
        assert!(detail.user_ids.is_empty());
    }

    #[tokio::test]
    async fn test_login_fails_when_grant_storage_is_down() {
        let db = TestDatabase::new().await;
        fixtures::user(db.db(), "alice").await;

        let grants = Arc::new(MemoryStore::new());
        grants.set_offline(true);
        let resolver = PermissionResolver::from_store(grants, ResolverConfig::default());
        let auth = AuthSystem::new(
            &Default::default(),
            db.db_arc(),
            ProfileService::new(Arc::new(resolver), db.db_arc()),
        );

        let err = auth.login("alice", PASSWORD).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
        assert_eq!(err.http_status(), 503);
    }

    #[tokio::test]
    async fn test_state_column_round_trips() {
        let db = TestDatabase::new().await;
        let alice = fixtures::user(db.db(), "alice").await;

        db.db()
            .set_user_state(alice, EntityState::Disabled)
            .await
            .unwrap();
        let user = db.db().find_user_by_id(alice).await.unwrap().unwrap();
        assert_eq!(user.state, EntityState::Disabled);
    }
}
