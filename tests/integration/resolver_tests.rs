//! Permission resolution against the SQLite backend

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use crate::common::fixtures::{self, Scenario, power_ids};
    use rbac_admin::core::models::{EntityState, PowerAction, UserId};
    use rbac_admin::core::stores::{GroupRoleStore, RoleAssignmentStore, RolePowerStore};
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn test_union_of_direct_and_group_grants() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;

        let powers = db.resolver().resolve(scenario.user).await.unwrap();
        assert_eq!(power_ids(&powers), scenario.expected_powers());
    }

    #[tokio::test]
    async fn test_detailed_trace_matches_seeded_rows() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;

        let resolved = db.resolver().resolve_detailed(scenario.user).await.unwrap();
        assert_eq!(resolved.direct_role_ids, BTreeSet::from([scenario.direct_role]));
        assert_eq!(resolved.group_ids, BTreeSet::from([scenario.group]));
        assert_eq!(resolved.group_role_ids, BTreeSet::from([scenario.group_role]));
        assert_eq!(
            resolved.role_ids,
            BTreeSet::from([scenario.direct_role, scenario.group_role])
        );
    }

    #[tokio::test]
    async fn test_power_granted_twice_appears_once() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        db.db()
            .set_role_powers(
                scenario.group_role,
                &[scenario.direct_power, scenario.group_power],
            )
            .await
            .unwrap();

        let powers = db.resolver().resolve(scenario.user).await.unwrap();
        assert_eq!(power_ids(&powers), scenario.expected_powers());
    }

    #[tokio::test]
    async fn test_role_reached_both_ways_counts_once() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        db.db()
            .set_group_roles(scenario.group, &[scenario.group_role, scenario.direct_role])
            .await
            .unwrap();

        let resolved = db.resolver().resolve_detailed(scenario.user).await.unwrap();
        assert_eq!(resolved.role_ids.len(), 2);
        assert_eq!(power_ids(&resolved.powers), scenario.expected_powers());
    }

    #[tokio::test]
    async fn test_user_without_grants() {
        let db = TestDatabase::new().await;
        Scenario::seed(db.db()).await;
        let loner = fixtures::user(db.db(), "loner").await;

        let resolved = db.resolver().resolve_detailed(loner).await.unwrap();
        assert!(resolved.is_empty());
        assert!(resolved.role_ids.is_empty());
        assert!(resolved.group_ids.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_empty_not_an_error() {
        let db = TestDatabase::new().await;
        Scenario::seed(db.db()).await;

        let powers = db.resolver().resolve(UserId(4242)).await.unwrap();
        assert!(powers.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_resolution_is_identical() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let resolver = db.resolver();

        let first = resolver.resolve_detailed(scenario.user).await.unwrap();
        let second = resolver.resolve_detailed(scenario.user).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_disabled_role_still_grants() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        db.db()
            .set_role_state(scenario.group_role, EntityState::Disabled)
            .await
            .unwrap();

        let powers = db.resolver().resolve(scenario.user).await.unwrap();
        assert_eq!(power_ids(&powers), scenario.expected_powers());
    }

    #[tokio::test]
    async fn test_clearing_direct_roles_keeps_group_path() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        db.db().set_user_roles(scenario.user, &[]).await.unwrap();

        let powers = db.resolver().resolve(scenario.user).await.unwrap();
        assert_eq!(power_ids(&powers), vec![scenario.group_power]);
    }

    #[tokio::test]
    async fn test_power_records_carry_key_and_action() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;

        let powers = db.resolver().resolve(scenario.user).await.unwrap();
        let direct = powers
            .iter()
            .find(|power| power.id == scenario.direct_power)
            .unwrap();
        assert_eq!(direct.resource_key, "user");
        assert_eq!(direct.action, PowerAction::View);
    }

    #[tokio::test]
    async fn test_batch_role_lookup_covers_every_user() {
        let db = TestDatabase::new().await;
        let scenario = Scenario::seed(db.db()).await;
        let loner = fixtures::user(db.db(), "loner").await;

        let map = db
            .db()
            .roles_for_users(&[scenario.user, loner])
            .await
            .unwrap();
        assert_eq!(map[&scenario.user], BTreeSet::from([scenario.direct_role]));
        assert!(map[&loner].is_empty());
    }
}
