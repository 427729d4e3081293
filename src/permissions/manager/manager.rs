/*!
 * Permission Manager
 * Central entry point for layout, store and entrance permission checks
 */

use super::fill::fill_user;
use super::request::{header_permissions, user_id};
use crate::acl::{Action, Actions, EntityKind};
use crate::core::config::AclConfig;
use crate::core::errors::{CacheError, PermissionError, PermissionResult};
use crate::core::limits::{ID_SEPARATOR, WILDCARD};
use crate::permissions::cache::{MemoryUserCache, User, UserCache};
use crate::permissions::policy::Permissions;
use crate::repos::ConnManager;
use arc_swap::ArcSwap;
use http::Request;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Central permission manager
///
/// Cheap to clone; clones share the policy, cache and repositories.
#[derive(Clone)]
pub struct PermissionManager {
    /// Fallback policy for requests without a usable header
    policy: Arc<ArcSwap<Permissions>>,
    /// Expanded user snapshots
    cache: Arc<dyn UserCache>,
    /// Layout ID routing for ACL expansion
    repos: Arc<ConnManager>,
    config: AclConfig,
}

impl PermissionManager {
    pub fn new(
        cache: Arc<dyn UserCache>,
        repos: Arc<ConnManager>,
        policy: Permissions,
        config: AclConfig,
    ) -> Self {
        debug!(rules = policy.len(), "Initializing permission manager");
        Self {
            policy: Arc::new(ArcSwap::from_pointee(policy)),
            cache,
            repos,
            config,
        }
    }

    /// In-memory cache and default policy taken from `config`
    pub fn with_config(config: AclConfig, repos: Arc<ConnManager>) -> Self {
        let cache = Arc::new(MemoryUserCache::new(config.cache_capacity));
        let policy = Permissions::from(config.default_policy);
        Self::new(cache, repos, policy, config)
    }

    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    /// Replace the fallback policy; an empty policy is ignored
    pub fn set_policy(&self, policy: Permissions) {
        if policy.is_empty() {
            debug!("Ignoring empty policy");
            return;
        }
        self.policy.store(Arc::new(policy));
    }

    pub fn policy(&self) -> Arc<Permissions> {
        self.policy.load_full()
    }

    /// Policy of the request, or the fallback policy
    ///
    /// A malformed header is logged and never surfaced to the caller.
    pub fn from_request<B>(&self, req: &Request<B>) -> Arc<Permissions> {
        match header_permissions(req.headers()) {
            Some(Ok(policy)) => Arc::new(policy),
            Some(Err(e)) => {
                warn!(error = %e, "Extract permissions from request failed, using default policy");
                self.policy()
            }
            None => {
                debug!("No permission header, using default policy");
                self.policy()
            }
        }
    }

    /// Layout-level decision, needs no cache or repository
    pub fn check_layout<B>(&self, req: &Request<B>, layout_id: &str, action: &Action) -> bool {
        self.from_request(req).check_layout(layout_id, action)
    }

    /// Store-level decision, falling back to the layout decision when the
    /// layout has no store rules. Fails closed on any error.
    pub async fn check_store<B>(
        &self,
        req: &Request<B>,
        layout_id: &str,
        store_id: &str,
        action: &Action,
    ) -> bool {
        self.check_entity(req, layout_id, EntityKind::Stores, store_id, action)
            .await
    }

    /// Entrance-level decision, see [`Self::check_store`]
    pub async fn check_enter<B>(
        &self,
        req: &Request<B>,
        layout_id: &str,
        enter_id: &str,
        action: &Action,
    ) -> bool {
        self.check_entity(req, layout_id, EntityKind::Enters, enter_id, action)
            .await
    }

    async fn check_entity<B>(
        &self,
        req: &Request<B>,
        layout_id: &str,
        kind: EntityKind,
        id: &str,
        action: &Action,
    ) -> bool {
        let user = match self.get_user(req).await {
            Ok(user) => user,
            Err(e) => {
                error!(layout_id, entity = ?kind, id, error = %e, "Permission check failed closed");
                return false;
            }
        };

        match user.check(layout_id, kind, id, action) {
            Some(allow) => allow,
            None => self.check_layout(req, layout_id, action),
        }
    }

    /// Allowed subset of the comma-separated `input_list`
    ///
    /// `*` means every store; it is replaced by `input_list` itself when the
    /// caller asked for specific IDs. An empty string means nothing is allowed.
    pub async fn filtered_stores<B>(
        &self,
        req: &Request<B>,
        layout_id: &str,
        input_list: &str,
        action: &Action,
    ) -> PermissionResult<String> {
        let user = self.user_or_log(req, layout_id).await?;
        let input: Vec<&str> = input_list.split(ID_SEPARATOR).collect();
        let output = user
            .filtered_stores(layout_id, &Actions::from(action.clone()), &input)
            .unwrap_or_else(|| self.layout_grant(req, layout_id, action));
        Ok(join_filtered(output, input_list))
    }

    /// Entrance counterpart of [`Self::filtered_stores`]
    pub async fn filtered_enters<B>(
        &self,
        req: &Request<B>,
        layout_id: &str,
        input_list: &str,
        action: &Action,
    ) -> PermissionResult<String> {
        let user = self.user_or_log(req, layout_id).await?;
        let input: Vec<&str> = input_list.split(ID_SEPARATOR).collect();
        let output = user
            .filtered_enters(layout_id, &Actions::from(action.clone()), &input)
            .unwrap_or_else(|| self.layout_grant(req, layout_id, action));
        Ok(join_filtered(output, input_list))
    }

    /// `["*"]` when the layout decision allows `action`, nothing otherwise
    fn layout_grant<B>(&self, req: &Request<B>, layout_id: &str, action: &Action) -> Vec<String> {
        if self.check_layout(req, layout_id, action) {
            vec![WILDCARD.to_string()]
        } else {
            Vec::new()
        }
    }

    async fn user_or_log<B>(&self, req: &Request<B>, layout_id: &str) -> PermissionResult<Arc<User>> {
        self.get_user(req).await.inspect_err(|e| {
            error!(layout_id, error = %e, "Filtering failed closed");
        })
    }

    /// Cached snapshot of the caller, expanded and cached on a miss
    pub async fn get_user<B>(&self, req: &Request<B>) -> PermissionResult<Arc<User>> {
        let user_id = user_id(req.headers());
        match self.cache.get(&user_id).await {
            Ok(user) => return Ok(user),
            Err(CacheError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let policy = self.from_request(req);
        let timeout = self.config.fill_timeout;
        let user = tokio::time::timeout(timeout, fill_user(&self.repos, &user_id, &policy))
            .await
            .map_err(|_| PermissionError::FillTimeout {
                user_id: user_id.clone(),
                timeout_ms: timeout.as_millis() as u64,
            })??;

        self.cache
            .add(&user_id, user.clone(), self.config.cache_ttl)
            .await?;
        Ok(Arc::new(user))
    }
}

fn join_filtered(output: Vec<String>, input_list: &str) -> String {
    let joined = output.join(ID_SEPARATOR);
    if joined == WILDCARD && !input_list.is_empty() {
        input_list.to_string()
    } else {
        joined
    }
}
