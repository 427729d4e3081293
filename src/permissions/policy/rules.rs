/*!
 * Policy Rules
 * Ordered permission rules evaluated with last-match-wins semantics
 */

use super::resource::{capture, Category};
use crate::acl::{Action, Actions, Effect};
use crate::core::config::DefaultPolicyKind;
use crate::core::limits::{ID_SEPARATOR, WILDCARD};
use serde::{Deserialize, Serialize};

/// One policy rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub actions: Actions,
    #[serde(default)]
    pub effect: Effect,
    /// Carried through untouched, never evaluated
    #[serde(default)]
    pub conditions: Option<serde_json::Value>,
}

/// Raw store selectors of a rule, not yet resolved to store IDs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFilters {
    pub by_stores: String,
    pub by_cities: String,
    pub by_regions: String,
    pub by_countries: String,
}

impl StoreFilters {
    /// No restriction in any category
    pub fn all() -> Self {
        Self {
            by_stores: WILDCARD.to_string(),
            by_cities: WILDCARD.to_string(),
            by_regions: WILDCARD.to_string(),
            by_countries: WILDCARD.to_string(),
        }
    }

    /// True when the action is not allowed for any store
    pub fn is_empty(&self) -> bool {
        self.by_stores.is_empty()
            && self.by_cities.is_empty()
            && self.by_regions.is_empty()
            && self.by_countries.is_empty()
    }
}

fn or_wildcard(value: String) -> String {
    if value.is_empty() {
        WILDCARD.to_string()
    } else {
        value
    }
}

impl Permission {
    pub fn new(resources: &[&str], actions: Actions, effect: Effect) -> Self {
        Self {
            resources: resources.iter().map(|r| r.to_string()).collect(),
            actions,
            effect,
            conditions: None,
        }
    }

    /// True if any resource names `layout_id` or `*` among its layouts
    pub fn check_layout(&self, layout_id: &str) -> bool {
        self.resources.iter().any(|r| {
            capture(r, Category::Layouts)
                .split(ID_SEPARATOR)
                .any(|id| id == layout_id || id == WILDCARD)
        })
    }

    /// Every layout ID the rule references, across all resources
    pub fn layouts(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|r| capture(r, Category::Layouts))
            .filter(|ids| !ids.is_empty())
            .flat_map(|ids| ids.split(ID_SEPARATOR))
            .map(str::to_string)
            .collect()
    }

    /// Raw store selectors; a later resource overrides an earlier one per category
    pub fn stores(&self) -> StoreFilters {
        let mut filters = StoreFilters::default();
        for r in &self.resources {
            let pairs = [
                (Category::Stores, &mut filters.by_stores),
                (Category::Cities, &mut filters.by_cities),
                (Category::Regions, &mut filters.by_regions),
                (Category::Countries, &mut filters.by_countries),
            ];
            for (category, slot) in pairs {
                let ids = capture(r, category);
                if !ids.is_empty() {
                    *slot = ids.to_string();
                }
            }
        }
        filters
    }
}

/// Ordered policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub Vec<Permission>);

impl Permissions {
    /// Every action on every layout
    pub fn default_allow() -> Self {
        Self(vec![Permission::new(
            &["*:data.counting:layouts:*"],
            Actions::from(Action::Any),
            Effect::Allow,
        )])
    }

    /// No action on any layout
    pub fn default_deny() -> Self {
        Self(vec![Permission::new(
            &["*:data.counting:layouts:*"],
            Actions::from(Action::Any),
            Effect::Deny,
        )])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Permission> {
        self.0.iter()
    }

    /// Effect of the last rule matching `layout_id` and `action`; deny if none matches
    pub fn check_layout(&self, layout_id: &str, action: &Action) -> bool {
        self.0
            .iter()
            .filter(|p| p.actions.has_action(action) && p.check_layout(layout_id))
            .fold(false, |_, p| p.effect.is_allow())
    }

    /// Store selectors of the last allow rule for `action`
    ///
    /// Categories the rule leaves open come back as `*`. Deny rules are
    /// skipped. If no allow rule covers the action all four are empty.
    pub fn stores_filters(&self, action: &Action) -> StoreFilters {
        self.0
            .iter()
            .filter(|p| p.actions.has_action(action) && p.effect.is_allow())
            .fold(StoreFilters::default(), |_, p| {
                let raw = p.stores();
                StoreFilters {
                    by_stores: or_wildcard(raw.by_stores),
                    by_cities: or_wildcard(raw.by_cities),
                    by_regions: or_wildcard(raw.by_regions),
                    by_countries: or_wildcard(raw.by_countries),
                }
            })
    }
}

impl From<Vec<Permission>> for Permissions {
    fn from(rules: Vec<Permission>) -> Self {
        Self(rules)
    }
}

impl From<DefaultPolicyKind> for Permissions {
    fn from(kind: DefaultPolicyKind) -> Self {
        match kind {
            DefaultPolicyKind::Allow => Self::default_allow(),
            DefaultPolicyKind::Deny => Self::default_deny(),
        }
    }
}

impl<'a> IntoIterator for &'a Permissions {
    type Item = &'a Permission;
    type IntoIter = std::slice::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
