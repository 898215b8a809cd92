//! Effective permission resolution
//!
//! A user's effective powers are the union of the powers granted to the roles
//! assigned to the user directly and the roles granted to any group the user
//! belongs to. Grants are flat: a role's parent contributes nothing, and
//! entity state is not consulted.

mod engine;
#[cfg(test)]
mod tests;
mod types;

pub use engine::PermissionResolver;
pub use types::ResolvedPermissions;
