//! Configuration loading end to end

#[cfg(test)]
mod tests {
    use rbac_admin::config::Config;
    use rbac_admin::core::models::UserId;
    use rbac_admin::{AdminSystem, RbacError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const IN_MEMORY: &str = r#"
storage:
  database:
    url: "sqlite::memory:"
    max_connections: 1
resolver:
  timeout_ms: 2000
  parallel_lookups: false
logging:
  level: "rbac_admin=debug,sea_orm=warn"
"#;

    #[tokio::test]
    async fn test_admin_system_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(IN_MEMORY.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert!(!config.resolver().parallel_lookups);

        let admin = AdminSystem::new(config).await.unwrap();
        admin.init_schema().await.unwrap();
        assert!(admin.storage().health_check().await.overall);

        let powers = admin.resolver().resolve(UserId(1)).await.unwrap();
        assert!(powers.is_empty());
    }

    #[tokio::test]
    async fn test_schema_creation_is_repeatable() {
        let config = Config::from_yaml(IN_MEMORY).unwrap();
        let admin = AdminSystem::new(config).await.unwrap();

        admin.init_schema().await.unwrap();
        admin.init_schema().await.unwrap();
    }

    #[test]
    fn test_rejects_unknown_database_scheme() {
        let err = Config::from_yaml(
            r#"
storage:
  database:
    url: "mysql://localhost/rbac"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RbacError::Config(_)));
    }

    #[test]
    fn test_rejects_oversized_resolver_timeout() {
        let err = Config::from_yaml(
            r#"
resolver:
  timeout_ms: 600000
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RbacError::Config(_)));
    }
}
