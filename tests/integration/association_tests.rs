//! Replace semantics and reference checks of the SQLite association stores

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use crate::common::fixtures::{self, Scenario};
    use rbac_admin::core::models::{PowerAction, PowerId, ResourceId, RoleId, UserGroupId, UserId};
    use rbac_admin::core::stores::{
        GroupMembershipStore, GroupRoleStore, PowerResourceStore, RoleAssignmentStore,
        RolePowerStore,
    };
    use rbac_admin::utils::error::{RbacError, ReferenceKind};
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn test_set_replaces_whole_set() {
        let db = TestDatabase::new().await;
        let user = fixtures::user(db.db(), "u").await;
        let a = fixtures::role(db.db(), "a").await;
        let b = fixtures::role(db.db(), "b").await;
        let c = fixtures::role(db.db(), "c").await;

        db.db().set_user_roles(user, &[a, b]).await.unwrap();
        db.db().set_user_roles(user, &[b, c]).await.unwrap();

        let roles = db.db().roles_for_user(user).await.unwrap();
        assert_eq!(roles, BTreeSet::from([b, c]));
    }

    #[tokio::test]
    async fn test_duplicate_targets_collapse() {
        let db = TestDatabase::new().await;
        let user = fixtures::user(db.db(), "u").await;
        let a = fixtures::role(db.db(), "a").await;

        db.db().set_user_roles(user, &[a, a, a]).await.unwrap();

        assert_eq!(db.db().roles_for_user(user).await.unwrap(), BTreeSet::from([a]));
        assert_eq!(db.db().users_for_role(a).await.unwrap(), BTreeSet::from([user]));
    }

    #[tokio::test]
    async fn test_both_directions_see_the_same_rows() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let other = fixtures::user(db.db(), "other").await;

        db.db()
            .set_group_users(scenario.group, &[scenario.user, other])
            .await
            .unwrap();

        assert_eq!(
            db.db().groups_for_user(other).await.unwrap(),
            BTreeSet::from([scenario.group])
        );
        assert_eq!(
            db.db().groups_for_role(scenario.group_role).await.unwrap(),
            BTreeSet::from([scenario.group])
        );
        assert_eq!(
            db.db().roles_for_power(scenario.group_power).await.unwrap(),
            BTreeSet::from([scenario.group_role])
        );
    }

    #[tokio::test]
    async fn test_unknown_target_is_rejected_without_writes() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;

        let err = db
            .db()
            .set_user_roles(scenario.user, &[scenario.group_role, RoleId(900), RoleId(901)])
            .await
            .unwrap_err();
        match err {
            RbacError::InvalidReference { kind, ids } => {
                assert_eq!(kind, ReferenceKind::Role);
                assert_eq!(ids, vec![900, 901]);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(
            db.db().roles_for_user(scenario.user).await.unwrap(),
            BTreeSet::from([scenario.direct_role])
        );
    }

    #[tokio::test]
    async fn test_unknown_owner_is_rejected() {
        let db = TestDatabase::new().await;
        let role = fixtures::role(db.db(), "a").await;

        let err = db
            .db()
            .set_user_roles(UserId(777), &[role])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RbacError::InvalidReference {
                kind: ReferenceKind::User,
                ..
            }
        ));
        assert!(db.db().users_for_role(role).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_set_clears() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;

        db.db().set_role_powers(scenario.group_role, &[]).await.unwrap();
        db.db().set_user_groups(scenario.user, &[]).await.unwrap();

        assert!(
            db.db()
                .powers_for_roles(&BTreeSet::from([scenario.group_role]))
                .await
                .unwrap()
                .is_empty()
        );
        assert!(db.db().groups_for_user(scenario.user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_power_resource_links() {
        let db = TestDatabase::new().await;
        let power = fixtures::power(db.db(), "user", PowerAction::Create).await;
        let users = fixtures::resource(db.db(), "user").await;
        let roles = fixtures::resource(db.db(), "role").await;

        db.db()
            .set_power_resources(power, &[users, roles])
            .await
            .unwrap();
        assert_eq!(
            db.db().resources_for_power(power).await.unwrap(),
            BTreeSet::from([users, roles])
        );

        db.db().set_resource_powers(roles, &[]).await.unwrap();
        assert_eq!(
            db.db().resources_for_power(power).await.unwrap(),
            BTreeSet::from([users])
        );

        let err = db
            .db()
            .set_resource_powers(ResourceId(55), &[power])
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 422);
    }

    #[tokio::test]
    async fn test_unknown_owner_kind_is_reported() {
        let db = TestDatabase::new().await;
        let group = fixtures::group(db.db(), "g").await;

        let err = db
            .db()
            .set_group_roles(UserGroupId(group.get() + 100), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RbacError::InvalidReference {
                kind: ReferenceKind::UserGroup,
                ..
            }
        ));

        let err = db
            .db()
            .set_power_roles(PowerId(31), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RbacError::InvalidReference {
                kind: ReferenceKind::Power,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_deleting_user_removes_its_rows() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;

        db.db().delete_user(scenario.user).await.unwrap();

        assert!(db.db().users_for_role(scenario.direct_role).await.unwrap().is_empty());
        assert!(db.db().users_in_group(scenario.group).await.unwrap().is_empty());
        assert!(db.resolver().resolve(scenario.user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_role_removes_its_grants() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;

        db.db().delete_role(scenario.group_role).await.unwrap();

        let powers = db.resolver().resolve(scenario.user).await.unwrap();
        assert_eq!(
            powers.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![scenario.direct_power]
        );
        assert!(db.db().roles_for_power(scenario.group_power).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_power_drops_it_from_resolution() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;

        db.db().delete_power(scenario.direct_power).await.unwrap();

        let powers = db.resolver().resolve(scenario.user).await.unwrap();
        assert_eq!(
            powers.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![scenario.group_power]
        );
    }

    #[tokio::test]
    async fn test_deleting_missing_row_is_not_found() {
        let db = TestDatabase::new().await;

        let err = db.db().delete_user_group(UserGroupId(12)).await.unwrap_err();
        assert!(matches!(err, RbacError::NotFound(_)));
    }
}
