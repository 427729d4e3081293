/*!
 * In-Memory User Cache
 * Concurrent TTL cache of expanded user snapshots
 */

use super::{User, UserCache};
use crate::core::errors::CacheError;
use crate::core::limits::DEFAULT_USER_CACHE_CAPACITY;
use ahash::RandomState;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CachedUser {
    user: Arc<User>,
    expires_at: Instant,
}

/// User cache backed by a sharded map
///
/// # Performance
/// - Cache-line aligned so the hit/miss counters, bumped on every request, do not false-share
#[repr(C, align(64))]
pub struct MemoryUserCache {
    users: DashMap<String, CachedUser, RandomState>,
    max_size: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryUserCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            users: DashMap::with_capacity_and_hasher(max_size.min(1024), RandomState::new()),
            max_size: max_size.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lookup(&self, user_id: &str) -> Option<Arc<User>> {
        let now = Instant::now();
        if let Some(entry) = self.users.get(user_id) {
            if entry.expires_at > now {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&entry.user));
            }
        }
        self.remove_expired(user_id, now);

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Drop `user_id` only if still expired at `now`; a concurrent re-add survives
    fn remove_expired(&self, user_id: &str, now: Instant) {
        self.users.remove_if(user_id, |_, cached| cached.expires_at <= now);
    }

    fn insert(&self, user_id: &str, user: User, ttl: Duration) {
        // Size limit: drop an arbitrary entry when full
        if !self.users.contains_key(user_id) && self.users.len() >= self.max_size {
            if let Some(entry) = self.users.iter().next() {
                let key = entry.key().clone();
                drop(entry);
                self.users.remove(&key);
            }
        }

        self.users.insert(
            user_id.to_string(),
            CachedUser {
                user: Arc::new(user),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drop one user so the next request rebuilds it
    pub fn invalidate_user(&self, user_id: &str) {
        self.users.remove(user_id);
    }

    pub fn clear(&self) {
        self.users.clear();
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            size: self.users.len(),
            max_size: self.max_size,
            hits,
            misses,
            hit_rate,
        }
    }
}

impl Default for MemoryUserCache {
    fn default() -> Self {
        Self::new(DEFAULT_USER_CACHE_CAPACITY)
    }
}

#[async_trait]
impl UserCache for MemoryUserCache {
    async fn get(&self, user_id: &str) -> Result<Arc<User>, CacheError> {
        self.lookup(user_id).ok_or(CacheError::NotFound)
    }

    async fn add(&self, user_id: &str, user: User, ttl: Duration) -> Result<(), CacheError> {
        self.insert(user_id, user, ttl);
        Ok(())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}
