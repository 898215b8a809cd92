//! Permission resolver configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Permission resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Deadline for one resolution in milliseconds, 0 for none
    #[serde(default = "default_resolver_timeout_ms")]
    pub timeout_ms: u64,
    /// Look up direct roles and group memberships concurrently
    #[serde(default = "default_true")]
    pub parallel_lookups: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_resolver_timeout_ms(),
            parallel_lookups: true,
        }
    }
}

impl ResolverConfig {
    /// Configured deadline, if any
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}
