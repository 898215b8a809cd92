//! Error classification for callers
//!
//! The authentication and profile flows map errors through [`ErrorKind`] so
//! that a storage outage is reported as a service failure and never as an
//! empty permission set.

use super::types::RbacError;

/// Coarse classification of an [`RbacError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Backing store could not complete the request (includes deadlines)
    StorageUnavailable,
    /// An association named an entity that does not exist
    InvalidReference,
    /// The addressed entity does not exist
    NotFound,
    /// Request understood but refused (credentials, state, conflicts, input)
    Rejected,
    /// Anything else
    Internal,
}

impl RbacError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RbacError::Database(_)
            | RbacError::StorageUnavailable(_)
            | RbacError::Timeout(_)
            | RbacError::Cancelled(_) => ErrorKind::StorageUnavailable,
            RbacError::InvalidReference { .. } => ErrorKind::InvalidReference,
            RbacError::NotFound(_) => ErrorKind::NotFound,
            RbacError::Disabled(_)
            | RbacError::Conflict(_)
            | RbacError::InvalidCredentials
            | RbacError::Forbidden(_)
            | RbacError::Validation(_) => ErrorKind::Rejected,
            RbacError::Config(_)
            | RbacError::Serialization(_)
            | RbacError::Yaml(_)
            | RbacError::Io(_)
            | RbacError::Crypto(_)
            | RbacError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the failure came from the storage layer
    pub fn is_storage_unavailable(&self) -> bool {
        self.kind() == ErrorKind::StorageUnavailable
    }

    /// HTTP status a transport layer should report for this error
    pub fn http_status(&self) -> u16 {
        match self {
            RbacError::Database(_) | RbacError::StorageUnavailable(_) | RbacError::Cancelled(_) => {
                503
            }
            RbacError::Timeout(_) => 504,
            RbacError::InvalidReference { .. } => 422,
            RbacError::NotFound(_) => 404,
            RbacError::Disabled(_) | RbacError::Forbidden(_) => 403,
            RbacError::Conflict(_) => 409,
            RbacError::InvalidCredentials => 401,
            RbacError::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            RbacError::Config(_) => "CONFIG_ERROR",
            RbacError::Database(_) => "DATABASE_ERROR",
            RbacError::StorageUnavailable(_) => "SERVICE_UNAVAILABLE",
            RbacError::Serialization(_) | RbacError::Yaml(_) => "SERIALIZATION_ERROR",
            RbacError::Io(_) => "IO_ERROR",
            RbacError::Timeout(_) => "OPERATION_TIMEOUT",
            RbacError::Cancelled(_) => "OPERATION_CANCELLED",
            RbacError::InvalidReference { .. } => "INVALID_REFERENCE",
            RbacError::NotFound(_) => "RESOURCE_NOT_FOUND",
            RbacError::Disabled(_) => "RESOURCE_DISABLED",
            RbacError::Conflict(_) => "RESOURCE_OCCUPIED",
            RbacError::InvalidCredentials => "INVALID_CREDENTIALS",
            RbacError::Forbidden(_) => "ACCESS_FORBIDDEN",
            RbacError::Validation(_) => "PARAM_INVALID",
            RbacError::Crypto(_) => "CRYPTO_ERROR",
            RbacError::Internal(_) => "SYSTEM_ERROR",
        }
    }
}
