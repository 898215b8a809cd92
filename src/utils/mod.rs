//! Utility modules for the RBAC backend
//!
//! This module contains error types, logging setup and password hashing.

pub mod auth;
pub mod error;
pub mod logging;
