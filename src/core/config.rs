/*!
 * ACL Configuration
 *
 * Runtime configuration for the permission manager, loaded from
 * environment variables or a JSON file
 */

use super::errors::{PermissionError, PermissionResult};
use super::limits::{DEFAULT_USER_CACHE_CAPACITY, DEFAULT_USER_CACHE_TTL, FILL_ACL_TIMEOUT};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::path::Path;
use std::time::Duration;

pub const ENV_CACHE_TTL: &str = "LAYOUTCONFIG_ACL_CACHE_TTL_SECS";
pub const ENV_FILL_TIMEOUT: &str = "LAYOUTCONFIG_ACL_FILL_TIMEOUT_SECS";
pub const ENV_CACHE_CAPACITY: &str = "LAYOUTCONFIG_ACL_CACHE_CAPACITY";
pub const ENV_DEFAULT_POLICY: &str = "LAYOUTCONFIG_ACL_DEFAULT_POLICY";

/// Policy applied when a request carries no usable permission header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPolicyKind {
    #[default]
    Allow,
    Deny,
}

impl std::str::FromStr for DefaultPolicyKind {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(DefaultPolicyKind::Allow),
            "deny" => Ok(DefaultPolicyKind::Deny),
            other => Err(PermissionError::Config(format!(
                "{ENV_DEFAULT_POLICY}={other}, allowed only allow|deny"
            ))),
        }
    }
}

/// Permission manager configuration
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AclConfig {
    /// Lifetime of an expanded user snapshot
    #[serde_as(as = "DurationSeconds<u64>")]
    pub cache_ttl: Duration,
    /// Bound for the repository lookups of one ACL expansion
    #[serde_as(as = "DurationSeconds<u64>")]
    pub fill_timeout: Duration,
    /// Maximum user snapshots held in memory
    pub cache_capacity: usize,
    pub default_policy: DefaultPolicyKind,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_USER_CACHE_TTL,
            fill_timeout: FILL_ACL_TIMEOUT,
            cache_capacity: DEFAULT_USER_CACHE_CAPACITY,
            default_policy: DefaultPolicyKind::Allow,
        }
    }
}

impl AclConfig {
    /// Defaults overlaid with `LAYOUTCONFIG_ACL_*` environment variables
    pub fn from_env() -> PermissionResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a JSON document; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> PermissionResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PermissionError::Config(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| PermissionError::Config(format!("parse {}: {e}", path.display())))
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> PermissionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_CACHE_TTL) {
            config.cache_ttl = Duration::from_secs(parse_number(ENV_CACHE_TTL, &v)?);
        }
        if let Some(v) = lookup(ENV_FILL_TIMEOUT) {
            config.fill_timeout = Duration::from_secs(parse_number(ENV_FILL_TIMEOUT, &v)?);
        }
        if let Some(v) = lookup(ENV_CACHE_CAPACITY) {
            config.cache_capacity = parse_number(ENV_CACHE_CAPACITY, &v)? as usize;
        }
        if let Some(v) = lookup(ENV_DEFAULT_POLICY) {
            config.default_policy = v.parse()?;
        }

        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> PermissionResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| PermissionError::Config(format!("{key}={value}: {e}")))
}
