/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User cache errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CacheError {
    /// Expected on first sight of a user; triggers an ACL rebuild
    #[error("User not found in cache")]
    #[diagnostic(code(cache::not_found))]
    NotFound,

    #[error("Cache backend failure: {0}")]
    #[diagnostic(
        code(cache::backend),
        help("The user cache backend is unavailable. Check its connectivity.")
    )]
    Backend(String),
}

/// Layout repository errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum RepoError {
    #[error("Query failed: {0}")]
    #[diagnostic(
        code(repo::query_failed),
        help("The layout database rejected the lookup. View logs for details.")
    )]
    Query(String),

    #[error("Repository unavailable: {0}")]
    #[diagnostic(
        code(repo::unavailable),
        help("The layout database cannot be reached. Check the connection string.")
    )]
    Unavailable(String),
}

/// Permission evaluation errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum PermissionError {
    #[error("Not found repo for layoutID {layout_id}")]
    #[diagnostic(
        code(permission::repo_not_found),
        help("No registered repository serves this layout. Check ConnManager registration.")
    )]
    RepoNotFound { layout_id: String },

    #[error("Get {stage} error: {source}")]
    #[diagnostic(code(permission::repo_lookup))]
    Repo { stage: String, source: RepoError },

    #[error("Cache error: {0}")]
    #[diagnostic(transparent)]
    Cache(#[from] CacheError),

    #[error("Filling ACL for user {user_id} exceeded {timeout_ms}ms")]
    #[diagnostic(
        code(permission::fill_timeout),
        help("Layout repositories answered too slowly. Try increasing fill_timeout.")
    )]
    FillTimeout { user_id: String, timeout_ms: u64 },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(permission::configuration_error),
        help("Invalid configuration. Review LAYOUTCONFIG_ACL_* variables.")
    )]
    Config(String),
}

impl PermissionError {
    /// Attach the expansion stage to a repository failure
    pub fn repo(stage: impl Into<String>, source: RepoError) -> Self {
        PermissionError::Repo {
            stage: stage.into(),
            source,
        }
    }
}

/// Result type for permission operations
pub type PermissionResult<T> = Result<T, PermissionError>;
