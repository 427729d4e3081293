/*!
 * Core Module
 * Error taxonomy, constants and runtime configuration
 */

pub mod config;
pub mod errors;
pub mod limits;

pub use config::{AclConfig, DefaultPolicyKind};
pub use errors::{CacheError, PermissionError, PermissionResult, RepoError};
