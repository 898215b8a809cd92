//! Common test utilities for rbac-admin
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{Scenario, TestDatabase};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let db = TestDatabase::new().await;
//!     let scenario = Scenario::seed(db.db()).await;
//!     // ...
//! }
//! ```

pub mod database;
pub mod fixtures;

// Re-export commonly used items
pub use database::TestDatabase;
pub use fixtures::Scenario;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
