//! Integration tests for rbac-admin
//!
//! These tests run the real SeaORM backend on in-memory SQLite.

pub mod association_tests;
pub mod config_tests;
pub mod resolver_tests;
pub mod service_tests;
