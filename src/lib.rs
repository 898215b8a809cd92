//! # rbac-admin
//!
//! Role-based access control administration backend.
//!
//! Users, roles, user groups, resources and powers are managed through the
//! services in [`services`]. A user's effective permissions are the union of
//! the powers granted to the roles assigned directly to the user and the roles
//! granted to every group the user belongs to. [`PermissionResolver`] computes
//! that set on every login and profile fetch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rbac_admin::{AdminSystem, Config, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/rbac.yaml").await?;
//!     let admin = AdminSystem::new(config).await?;
//!     admin.init_schema().await?;
//!
//!     let powers = admin.resolver().resolve(UserId(1)).await?;
//!     for power in powers {
//!         println!("{} {}", power.action, power.resource_key);
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use crate::auth::{AuthSystem, CredentialLookup, ExternalIdentity};
pub use crate::config::Config;
pub use crate::core::AdminSystem;
pub use crate::core::models::{
    EntityState, Page, PageQuery, Power, PowerAction, PowerGrant, PowerId, ResourceId, RoleId,
    StateChange, User, UserGroupId, UserId, UserProfile,
};
pub use crate::core::resolver::{PermissionResolver, ResolvedPermissions};
pub use crate::storage::{MemoryStore, StorageLayer};
pub use crate::utils::error::{ErrorKind, RbacError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
