// Module declarations
mod association_ops;
mod connection;
mod links;
mod power_ops;
mod resource_ops;
mod role_ops;
mod types;
mod user_group_ops;
mod user_ops;

// Re-export public types
pub use types::{DatabaseBackendType, NewUserRecord, SeaOrmDatabase};
