/*!
 * Layout Config ACL Library
 * Permission evaluation for the layout configuration gateway
 *
 * Policies arrive per request in the `X-User-Permissions` header (base64
 * JSON) or fall back to a process-wide default. Layout checks evaluate the
 * policy directly; store and entrance checks use a per-user ACL snapshot
 * expanded through the layout repositories and cached.
 */

pub mod acl;
pub mod core;
pub mod monitoring;
pub mod permissions;
pub mod repos;

// Re-exports
pub use acl::{Action, Actions, Effect, EntityKind, Item, Items};
pub use crate::core::config::{AclConfig, DefaultPolicyKind};
pub use crate::core::errors::{CacheError, PermissionError, PermissionResult, RepoError};
pub use permissions::{
    MemoryUserCache, Permission, PermissionManager, Permissions, StoreFilters, User, UserCache,
};
pub use monitoring::init_tracing;
pub use repos::{ConnManager, LayoutRepo, MemoryLayoutRepo};
