/*!
 * Policy Module
 * Resource matching and ordered rule evaluation
 */

mod resource;
mod rules;

pub use resource::{capture, Category};
pub use rules::{Permission, Permissions, StoreFilters};
