//! Authentication
//!
//! Password and external-identity logins. Both end in the same profile the
//! profile-fetch path returns.

pub mod credential;
pub mod system;


pub use credential::{CredentialLookup, ExternalIdentity};
pub use system::AuthSystem;
