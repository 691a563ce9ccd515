//! In-memory read-through cache for command queries.
//!
//! This module provides the `CommandCache` used by list and detail reads. Values are stored
//! as serialized JSON with a fixed 5 minute TTL under the `commands:` namespace. Every
//! mutating command operation and every successful sync or deploy wipes the namespace.
//! Cache failures are logged and treated as misses so reads fall back to the database.

use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

/// Time-to-live for cached command reads in seconds.
pub const COMMAND_CACHE_TTL_SECONDS: u64 = 300;

/// Key prefix of every entry owned by the command subsystem.
const NAMESPACE: &str = "commands:";

/// Cached serialized value with expiration timestamp.
#[derive(Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Shared cache for command list and detail reads.
///
/// Cheap to clone; clones share the same underlying map. A disabled cache never stores
/// anything and every `get` is a miss.
#[derive(Clone)]
pub struct CommandCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
    enabled: bool,
}

impl CommandCache {
    /// Creates a new cache with the default TTL.
    ///
    /// # Arguments
    /// - `enabled` - `false` turns every operation into a no-op
    ///
    /// # Returns
    /// - `CommandCache` - Empty cache
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_secs(COMMAND_CACHE_TTL_SECONDS),
            enabled,
        }
    }

    /// Creates an enabled cache with a custom TTL.
    #[cfg(test)]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::new(true)
        }
    }

    /// Returns the cached value for `key` if present, unexpired and deserializable.
    ///
    /// Expired entries are evicted on access.
    ///
    /// # Arguments
    /// - `key` - Key within the command namespace
    ///
    /// # Returns
    /// - `Some(T)` - Cache hit
    /// - `None` - Miss, expired entry, disabled cache or undecodable entry
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }

        let key = namespaced(key);
        let entry = self.entries.read().await.get(&key).cloned()?;

        if entry.is_expired() {
            self.entries.write().await.remove(&key);
            return None;
        }

        match serde_json::from_str(&entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Dropping undecodable cache entry {}: {}", key, e);
                self.entries.write().await.remove(&key);
                None
            }
        }
    }

    /// Stores `value` under `key` for the cache TTL, replacing any previous entry.
    ///
    /// Expired entries are swept on every write. Serialization failures are logged and the
    /// value is simply not cached.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        if !self.enabled {
            return;
        }

        let value = match serde_json::to_string(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to serialize cache entry {}: {}", key, e);
                return;
            }
        };

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(
            namespaced(key),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Removes every entry in the command namespace.
    pub async fn invalidate_all(&self) {
        if !self.enabled {
            return;
        }

        let mut entries = self.entries.write().await;
        entries.retain(|key, _| !key.starts_with(NAMESPACE));
        tracing::debug!("Invalidated command cache");
    }

    /// Number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for CommandCache {
    fn default() -> Self {
        Self::new(true)
    }
}

fn namespaced(key: &str) -> String {
    format!("{}{}", NAMESPACE, key)
}
