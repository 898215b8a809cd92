//! Power (permission) model

use super::{Audit, EntityState, PowerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Action a power allows on its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    Manage,
    Create,
    View,
    Update,
    Delete,
}

impl PowerAction {
    pub const ALL: [PowerAction; 5] = [
        PowerAction::Manage,
        PowerAction::Create,
        PowerAction::View,
        PowerAction::Update,
        PowerAction::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PowerAction::Manage => "manage",
            PowerAction::Create => "create",
            PowerAction::View => "view",
            PowerAction::Update => "update",
            PowerAction::Delete => "delete",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manage" => Ok(PowerAction::Manage),
            "create" => Ok(PowerAction::Create),
            "view" => Ok(PowerAction::View),
            "update" => Ok(PowerAction::Update),
            "delete" => Ok(PowerAction::Delete),
            _ => Err(format!("Unknown power action: {}", s)),
        }
    }
}

/// A single grantable permission: one action on one resource key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Power {
    pub id: PowerId,
    pub resource_key: String,
    pub action: PowerAction,
    pub name: String,
    pub description: Option<String>,
    pub state: EntityState,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPower {
    pub resource_key: String,
    pub action: PowerAction,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpdate {
    pub resource_key: Option<String>,
    pub action: Option<PowerAction>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerFilter {
    /// Substring match on the name
    pub name: Option<String>,
    /// Substring match on the resource key
    pub resource_key: Option<String>,
    /// Exact action
    pub action: Option<PowerAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        for action in PowerAction::ALL {
            assert_eq!(action.as_str().parse::<PowerAction>().unwrap(), action);
        }
        assert_eq!("VIEW".parse::<PowerAction>().unwrap(), PowerAction::View);
        assert!("approve".parse::<PowerAction>().is_err());
    }

    #[test]
    fn test_action_wire_form() {
        let json = serde_json::to_string(&PowerAction::Manage).unwrap();
        assert_eq!(json, "\"manage\"");
    }
}
