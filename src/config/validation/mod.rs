//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `config_validators`: application, auth, resolver and logging validators
//! - `storage_validators`: storage validators
//! - `tests`: Test suite for all validators

mod config_validators;
mod storage_validators;
mod trait_def;

pub use trait_def::Validate;
