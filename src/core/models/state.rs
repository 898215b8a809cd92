//! Lifecycle state shared by every managed entity

use serde::{Deserialize, Serialize};

/// Enabled/disabled flag, persisted as `1` / `0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    /// Entity is active
    #[default]
    Enabled,
    /// Entity is switched off
    Disabled,
}

impl EntityState {
    /// Stored column value
    pub fn as_flag(self) -> i16 {
        match self {
            EntityState::Enabled => 1,
            EntityState::Disabled => 0,
        }
    }

    /// Decode the stored column value; anything but `0` counts as enabled
    pub fn from_flag(flag: i16) -> Self {
        if flag == 0 {
            EntityState::Disabled
        } else {
            EntityState::Enabled
        }
    }

    pub fn is_enabled(self) -> bool {
        self == EntityState::Enabled
    }

    pub fn is_disabled(self) -> bool {
        self == EntityState::Disabled
    }
}

/// Outcome of an enable/disable request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateChange {
    /// State was flipped
    Changed,
    /// Entity was already in the requested state
    Unchanged,
}

impl StateChange {
    /// Compare the current state with the requested one
    pub fn between(current: EntityState, target: EntityState) -> Self {
        if current == target {
            StateChange::Unchanged
        } else {
            StateChange::Changed
        }
    }
}
