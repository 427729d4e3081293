/*!
 * User ACL Cache
 * Expanded per-user ACL snapshots and the storage contract they live behind
 */

mod memory;

pub use memory::{CacheStats, MemoryUserCache};

use crate::acl::{new_entity_items, Action, Actions, EntityItems, EntityKind, Items};
use crate::core::errors::CacheError;
use crate::core::limits::WILDCARD;
use ahash::HashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Layout identifier, `*` for the all-layouts snapshot
pub type LayoutId = String;

/// Fully expanded ACL of one user
///
/// Built once on a cache miss and never mutated after insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub acls: HashMap<LayoutId, EntityItems>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            acls: HashMap::default(),
        }
    }

    /// Merge `ids` into the `(layout_id, kind)` item set, creating it if missing
    pub fn add_items<S: AsRef<str>>(
        &mut self,
        layout_id: &str,
        allow: bool,
        actions: &Actions,
        ids: &[S],
        kind: EntityKind,
    ) {
        let Some(entities) = self.acls.get_mut(layout_id) else {
            self.acls.insert(
                layout_id.to_string(),
                new_entity_items(actions, allow, ids, kind),
            );
            return;
        };
        match entities.get_mut(&kind) {
            Some(items) => items.merge(actions, allow, ids),
            None => {
                entities.insert(kind, Items::new(actions, allow, ids));
            }
        }
    }

    pub fn items(&self, layout_id: &str, kind: EntityKind) -> Option<&Items> {
        self.acls.get(layout_id).and_then(|e| e.get(&kind))
    }

    /// Allowed store IDs among `input`; `["*"]` means every store
    ///
    /// `None` when the layout has no store-level items, the layout decision
    /// then governs.
    pub fn filtered_stores<S: AsRef<str>>(
        &self,
        layout_id: &str,
        actions: &Actions,
        input: &[S],
    ) -> Option<Vec<String>> {
        self.filtered(layout_id, EntityKind::Stores, actions, input)
    }

    /// Allowed entrance IDs among `input`, see [`Self::filtered_stores`]
    pub fn filtered_enters<S: AsRef<str>>(
        &self,
        layout_id: &str,
        actions: &Actions,
        input: &[S],
    ) -> Option<Vec<String>> {
        self.filtered(layout_id, EntityKind::Enters, actions, input)
    }

    fn filtered<S: AsRef<str>>(
        &self,
        layout_id: &str,
        kind: EntityKind,
        actions: &Actions,
        input: &[S],
    ) -> Option<Vec<String>> {
        let entities = self
            .acls
            .get(layout_id)
            .or_else(|| self.acls.get(WILDCARD))?;

        entities
            .get(&kind)
            .filter(|items| !items.is_empty())
            .map(|items| items.filtered_list(actions, input))
    }

    /// Item-level answer for one entity, `None` when the layout has no such rules
    pub fn check(
        &self,
        layout_id: &str,
        kind: EntityKind,
        id: &str,
        action: &Action,
    ) -> Option<bool> {
        let (allow, has_items) = self.items(layout_id, kind)?.check(id, action);
        has_items.then_some(allow)
    }
}

/// Storage for expanded user snapshots
///
/// `get` answers [`CacheError::NotFound`] for absent or expired users.
#[async_trait]
pub trait UserCache: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Arc<User>, CacheError>;

    async fn add(&self, user_id: &str, user: User, ttl: Duration) -> Result<(), CacheError>;
}
