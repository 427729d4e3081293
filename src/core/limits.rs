/*!
 * Limits and Constants
 *
 * Centralized location for header names, timeouts and sizing defaults
 * used by the permission layer.
 */

use std::time::Duration;

// =============================================================================
// REQUEST HEADERS
// =============================================================================

/// Caller identity header, matched case-insensitively (`X-User-ID`, `X-User-Id`)
pub const X_USER_ID: &str = "X-User-ID";

/// Base64-encoded JSON policy of the caller
pub const X_USER_PERMISSIONS: &str = "X-User-Permissions";

/// Length of the random ID assigned to callers without an identity header
pub const ANONYMOUS_USER_ID_LEN: usize = 24;

// =============================================================================
// ACL EXPANSION
// =============================================================================

/// Upper bound for resolving a user's policy into store/entrance lists
/// [SECURITY] Exceeding it fails the check closed
pub const FILL_ACL_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for a single repository call made outside ACL expansion
pub const REPO_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifetime of an expanded user snapshot in the cache
pub const DEFAULT_USER_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Maximum number of user snapshots kept by the in-memory cache
pub const DEFAULT_USER_CACHE_CAPACITY: usize = 10_000;

// =============================================================================
// POLICY RESOURCES
// =============================================================================

/// Wildcard used in resource ID lists, item IDs and filtered results
pub const WILDCARD: &str = "*";

/// Separator of ID lists inside resources and request parameters
pub const ID_SEPARATOR: &str = ",";
