//! Error type definitions

use thiserror::Error;

/// Result type alias for the RBAC backend
pub type Result<T> = std::result::Result<T, RbacError>;

/// Kind of entity an association row points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    User,
    Role,
    UserGroup,
    Power,
    Resource,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReferenceKind::User => "user",
            ReferenceKind::Role => "role",
            ReferenceKind::UserGroup => "user group",
            ReferenceKind::Power => "power",
            ReferenceKind::Resource => "resource",
        };
        f.write_str(name)
    }
}

/// Main error type for the RBAC backend
#[derive(Error, Debug)]
pub enum RbacError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Non-database backend could not serve the request
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Deadline expired before the operation completed
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Operation abandoned because the caller cancelled it
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// An association rebind named entities that do not exist
    #[error("Invalid {kind} reference: {ids:?}")]
    InvalidReference { kind: ReferenceKind, ids: Vec<i32> },

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity exists but is disabled
    #[error("Disabled: {0}")]
    Disabled(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Username or password did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Forbidden errors
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
