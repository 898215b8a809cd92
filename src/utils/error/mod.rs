//! Error handling for the RBAC backend
//!
//! This module defines the crate error type and how it is classified for callers.

#![allow(missing_docs)]

mod category;
mod helpers;
mod types;

pub use category::ErrorKind;
pub use types::{RbacError, ReferenceKind, Result};
