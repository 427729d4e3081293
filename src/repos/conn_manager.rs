/*!
 * Connection Manager
 * Routes layout IDs to the repository that stores them
 */

use super::LayoutRepo;
use crate::core::errors::{PermissionError, PermissionResult, RepoError};
use crate::core::limits::{REPO_OPERATION_TIMEOUT, WILDCARD};
use ahash::{HashMap, HashSet};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Health probe outcome of one backing database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoHealth {
    pub dest: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Registry of layout repositories keyed by layout ID
///
/// The `*` key points at the most recently registered repository.
#[derive(Default)]
pub struct ConnManager {
    repos: RwLock<HashMap<String, Arc<dyn LayoutRepo>>>,
}

impl ConnManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every layout of `repo`, plus `*`, to it
    pub async fn register_repo(&self, repo: Arc<dyn LayoutRepo>) -> PermissionResult<()> {
        let layouts = tokio::time::timeout(REPO_OPERATION_TIMEOUT, repo.find_layouts())
            .await
            .map_err(|_| {
                PermissionError::repo(
                    "layouts",
                    RepoError::Unavailable(format!("{} did not answer in time", repo.dest())),
                )
            })?
            .map_err(|e| PermissionError::repo("layouts", e))?;

        info!(dest = %repo.dest(), layouts = layouts.len(), "Registered layout repository");

        let mut repos = self.repos.write();
        for layout_id in layouts {
            repos.insert(layout_id, Arc::clone(&repo));
        }
        repos.insert(WILDCARD.to_string(), repo);
        Ok(())
    }

    pub fn repo_by_id(&self, layout_id: &str) -> Option<Arc<dyn LayoutRepo>> {
        self.repos.read().get(layout_id).cloned()
    }

    /// Registered repositories, one per backing database
    pub fn repos(&self) -> Vec<Arc<dyn LayoutRepo>> {
        let repos = self.repos.read();
        let mut seen = HashSet::default();
        repos
            .values()
            .filter(|repo| seen.insert(repo.dest()))
            .cloned()
            .collect()
    }

    /// Probe every backing database once
    pub async fn health(&self) -> Vec<RepoHealth> {
        let mut report = Vec::new();
        for repo in self.repos() {
            let dest = repo.dest();
            let outcome = match tokio::time::timeout(REPO_OPERATION_TIMEOUT, repo.health()).await {
                Ok(result) => result,
                Err(_) => Err(RepoError::Unavailable("health probe timed out".into())),
            };
            let health = match outcome {
                Ok(()) => RepoHealth {
                    dest,
                    healthy: true,
                    error: None,
                },
                Err(e) => {
                    warn!(dest = %dest, error = %e, "Layout repository unhealthy");
                    RepoHealth {
                        dest,
                        healthy: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            report.push(health);
        }
        report.sort_by(|a, b| a.dest.cmp(&b.dest));
        report
    }
}
