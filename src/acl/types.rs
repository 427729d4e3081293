/*!
 * ACL Types
 * Actions, effects and entity kinds shared by policies and item sets
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action a policy rule grants or denies
///
/// Unknown action names survive decoding as [`Action::Other`] and never match
/// a concrete action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    /// `*` - every action
    Any,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Any => "*",
            Action::Other(s) => s,
        }
    }

    /// The four concrete actions, in flag order
    pub const CRUD: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        match s {
            "create" => Action::Create,
            "read" => Action::Read,
            "update" => Action::Update,
            "delete" => Action::Delete,
            "*" => Action::Any,
            other => Action::Other(other.to_string()),
        }
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        Action::from(s.as_str())
    }
}

impl From<Action> for String {
    fn from(a: Action) -> Self {
        match a {
            Action::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered action list of one rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actions(pub Vec<Action>);

impl Actions {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self(actions.into_iter().collect())
    }

    /// True if the list names `action` or contains `*`
    pub fn has_action(&self, action: &Action) -> bool {
        self.0.iter().any(|a| a == action || *a == Action::Any)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.0.iter()
    }
}

impl From<Action> for Actions {
    fn from(action: Action) -> Self {
        Self(vec![action])
    }
}

impl<'a> IntoIterator for &'a Actions {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome a matching rule asserts
///
/// Anything other than `allow` decodes as [`Effect::Deny`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Effect {
    Allow,
    #[default]
    Deny,
}

impl Effect {
    pub fn is_allow(self) -> bool {
        self == Effect::Allow
    }
}

impl From<String> for Effect {
    fn from(s: String) -> Self {
        if s == "allow" {
            Effect::Allow
        } else {
            Effect::Deny
        }
    }
}

impl From<Effect> for String {
    fn from(e: Effect) -> Self {
        match e {
            Effect::Allow => "allow".to_string(),
            Effect::Deny => "deny".to_string(),
        }
    }
}

/// Dimension along which a user's ACL is partitioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Layouts,
    Stores,
    Enters,
    Zones,
    Devices,
    Renters,
}
