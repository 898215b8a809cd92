//! Administrative services
//!
//! Each service owns the CRUD surface of one entity and the association
//! endpoints rooted at it. Grant changes go straight to the stores; only
//! [`ProfileService`] runs the permission resolver.

pub mod power;
pub mod profile;
pub mod resource;
pub mod role;
pub mod user;
pub mod user_group;

pub use power::PowerService;
pub use profile::ProfileService;
pub use resource::ResourceService;
pub use role::RoleService;
pub use user::UserService;
pub use user_group::UserGroupService;

use crate::core::models::EntityState;
use crate::utils::error::{RbacError, Result};

/// Reject a disabled entity on paths that require an enabled one
pub(crate) fn ensure_enabled(state: EntityState, what: &str) -> Result<()> {
    if state.is_disabled() {
        return Err(RbacError::disabled(format!("{} is disabled", what)));
    }
    Ok(())
}

/// Reject blank names and keys
pub(crate) fn ensure_not_blank(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RbacError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
