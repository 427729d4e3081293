/*!
 * Permissions Module
 * Policy evaluation, per-user ACL snapshots and the request-facing manager
 *
 * ## Usage
 * ```ignore
 * use layoutconfig_acl::{Action, AclConfig, ConnManager, PermissionManager};
 *
 * let manager = PermissionManager::with_config(AclConfig::from_env()?, repos);
 *
 * if manager.check_layout(&req, "118416189", &Action::Read) {
 *     let stores = manager
 *         .filtered_stores(&req, "118416189", "80817080,80079091", &Action::Read)
 *         .await?;
 * }
 * ```
 */

pub mod cache;
pub mod manager;
pub mod policy;

// Re-export commonly used items
pub use cache::{CacheStats, LayoutId, MemoryUserCache, User, UserCache};
pub use manager::{decode_permissions, user_id, HeaderError, PermissionManager};
pub use policy::{capture, Category, Permission, Permissions, StoreFilters};
