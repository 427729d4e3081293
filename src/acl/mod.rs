/*!
 * ACL Module
 * Resolved per-ID access rules built from high-level permission policies
 */

mod items;
mod types;

pub use items::{new_entity_items, EntityItems, Item, Items};
pub use types::{Action, Actions, Effect, EntityKind};
