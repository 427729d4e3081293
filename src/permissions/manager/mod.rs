/*!
 * Manager Module
 * Request-facing permission facade and the ACL expansion behind it
 */

mod fill;
mod manager;
mod request;

pub use manager::PermissionManager;
pub use request::{decode_permissions, user_id, HeaderError};
