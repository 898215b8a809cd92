//! Strongly typed identifiers
//!
//! Every table uses an auto-increment integer key. The newtypes keep a role id
//! from being passed where a power id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wrap a raw key
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Raw key value
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }
    };
}

entity_id!(
    /// User identifier
    UserId
);
entity_id!(
    /// Role identifier
    RoleId
);
entity_id!(
    /// User group identifier
    UserGroupId
);
entity_id!(
    /// Power identifier
    PowerId
);
entity_id!(
    /// Resource identifier
    ResourceId
);
