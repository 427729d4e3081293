/*!
 * ACL Item Sets
 * Per-ID permission flags kept sorted by ID for binary search
 */

use super::types::{Action, Actions, EntityKind};
use crate::core::limits::WILDCARD;
use ahash::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

/// Resolved permission flags for one concrete ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    fn with_actions(id: &str, actions: &Actions, allow: bool) -> Self {
        let mut item = Self::new(id);
        item.set_actions(actions, allow);
        item
    }

    /// Set the flags named by `actions` to `allow`, leaving the others untouched
    pub fn set_actions(&mut self, actions: &Actions, allow: bool) {
        for action in actions {
            match action {
                Action::Create => self.create = allow,
                Action::Read => self.read = allow,
                Action::Update => self.update = allow,
                Action::Delete => self.delete = allow,
                Action::Any => {
                    self.create = allow;
                    self.read = allow;
                    self.update = allow;
                    self.delete = allow;
                }
                Action::Other(_) => {}
            }
        }
    }

    /// Flag for `action`; `*` needs all four flags, unknown actions are denied
    pub fn allows(&self, action: &Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
            Action::Any => self.create && self.read && self.update && self.delete,
            Action::Other(_) => false,
        }
    }

    fn allows_any(&self, actions: &Actions) -> bool {
        actions.iter().any(|a| self.allows(a))
    }
}

/// Item set of one entity kind
///
/// Invariant: sorted by ID ascending, no duplicate IDs. Every mutator keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Items(Vec<Item>);

impl Items {
    /// Build a sorted set where every ID gets the same flags
    pub fn new<S: AsRef<str>>(actions: &Actions, allow: bool, ids: &[S]) -> Self {
        let mut items: Vec<Item> = ids
            .iter()
            .map(|id| Item::with_actions(id.as_ref(), actions, allow))
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items.dedup_by(|a, b| a.id == b.id);
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.0
    }

    fn position(&self, id: &str) -> Result<usize, usize> {
        self.0.binary_search_by(|item| item.id.as_str().cmp(id))
    }

    /// Allow effects only add IDs; deny effects overwrite or insert
    pub fn merge<S: AsRef<str>>(&mut self, actions: &Actions, allow: bool, ids: &[S]) {
        if allow {
            self.soft_merge(actions, allow, ids);
        } else {
            self.upsert(actions, allow, ids);
        }
    }

    /// Insert IDs that are not present yet; existing entries are never touched
    pub fn soft_merge<S: AsRef<str>>(&mut self, actions: &Actions, allow: bool, ids: &[S]) {
        for id in ids {
            let id = id.as_ref();
            if let Err(ix) = self.position(id) {
                self.0.insert(ix, Item::with_actions(id, actions, allow));
            }
        }
    }

    /// Replace the flags of present IDs, insert the rest
    pub fn upsert<S: AsRef<str>>(&mut self, actions: &Actions, allow: bool, ids: &[S]) {
        for id in ids {
            let id = id.as_ref();
            let item = Item::with_actions(id, actions, allow);
            match self.position(id) {
                Ok(ix) => self.0[ix] = item,
                Err(ix) => self.0.insert(ix, item),
            }
        }
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.0.iter().map(|item| item.id.clone()).collect()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.position(id).is_ok()
    }

    /// Single `*` entry governing every ID
    fn wildcard(&self) -> Option<&Item> {
        match self.0.as_slice() {
            [only] if only.id == WILDCARD => Some(only),
            _ => None,
        }
    }

    /// Returns `(allowed, has_entries)`
    ///
    /// An empty set answers `(true, false)` so the caller defers to a coarser
    /// check. A missing ID in a non-empty set is an explicit denial.
    pub fn check(&self, id: &str, action: &Action) -> (bool, bool) {
        if self.is_empty() {
            return (true, false);
        }
        if let Some(item) = self.wildcard() {
            return (item.allows(action), true);
        }
        match self.position(id) {
            Ok(ix) => (self.0[ix].allows(action), true),
            Err(_) => (false, true),
        }
    }

    /// IDs from `input` granted for any of `actions`
    ///
    /// Empty input, `[""]` and `["*"]` select every known ID. A wildcard set
    /// answers `["*"]` when granted. Order follows `input`, or ID order when
    /// every known ID is selected.
    pub fn filtered_list<S: AsRef<str>>(&self, actions: &Actions, input: &[S]) -> Vec<String> {
        if let Some(item) = self.wildcard() {
            return if item.allows_any(actions) {
                vec![WILDCARD.to_string()]
            } else {
                Vec::new()
            };
        }

        let select_all = match input {
            [] => true,
            [only] => matches!(only.as_ref(), "" | WILDCARD),
            _ => false,
        };
        if select_all {
            return self
                .0
                .iter()
                .filter(|item| item.allows_any(actions))
                .map(|item| item.id.clone())
                .collect();
        }

        let mut seen = HashSet::default();
        input
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| seen.insert(*id))
            .filter(|id| match self.position(id) {
                Ok(ix) => self.0[ix].allows_any(actions),
                Err(_) => false,
            })
            .map(str::to_string)
            .collect()
    }
}

/// Item sets of one layout, by entity kind
pub type EntityItems = HashMap<EntityKind, Items>;

/// Single-kind map, the starting point for a fresh layout entry
pub fn new_entity_items<S: AsRef<str>>(
    actions: &Actions,
    allow: bool,
    ids: &[S],
    kind: EntityKind,
) -> EntityItems {
    let mut map = EntityItems::default();
    map.insert(kind, Items::new(actions, allow, ids));
    map
}
