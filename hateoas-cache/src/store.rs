use crate::key::CacheKey;
use hateoas_types::ClientConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    cached_at: Instant,
}

/// Raw-payload cache shared by every request of a client.
///
/// Each operation takes the lock once, so a `get` that finds an expired
/// entry removes it atomically with respect to concurrent `put`/`evict`.
#[derive(Debug)]
pub struct CacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    life_time: Duration,
    api_base: String,
}

impl CacheStore {
    /// Creates a store. `api_base` is the URL prefix eviction scopes are
    /// computed against (the proxy URL when one is configured).
    pub fn new(api_base: impl Into<String>, life_time: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            life_time,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds a store from configuration, or `None` when caching is disabled.
    pub fn from_config(config: &ClientConfig) -> Option<Self> {
        config.cache.enabled.then(|| {
            Self::new(
                config.effective_base(),
                Duration::from_millis(config.cache.life_time_ms),
            )
        })
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn life_time(&self) -> Duration {
        self.life_time
    }

    /// Returns the cached payload, removing it first if it has expired.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let mut entries = self.entries();
        let entry = entries.get(key.value())?;

        if Instant::now() > entry.cached_at + self.life_time {
            entries.remove(key.value());
            debug!(key = %key, "cache entry expired");
            return None;
        }

        debug!(key = %key, "cache hit");
        Some(entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn put(&self, key: &CacheKey, value: Value) {
        self.entries().insert(
            key.value().to_string(),
            CacheEntry {
                value,
                cached_at: Instant::now(),
            },
        );
        debug!(key = %key, "cache put");
    }

    /// Removes every entry under the resource root of `key`'s URL.
    ///
    /// The root is matched case-insensitively, so `bookStores/1` evicts
    /// entries stored under `bookStores`. Returns the number of removed entries. A URL outside the API base has
    /// no root and evicts nothing.
    pub fn evict(&self, key: &CacheKey) -> usize {
        let root = hateoas_url::resource_name_from_url(key.url(), &self.api_base);
        if root.is_empty() {
            debug!(url = %key.url(), "no resource root, nothing to evict");
            return 0;
        }

        let prefix = format!("url={}/{}", self.api_base, root);
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|stored, _| {
            !stored
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(&prefix))
        });
        let evicted = before - entries.len();

        debug!(resource = %root, evicted, "cache evict");
        evicted
    }

    /// Removes exactly one entry.
    pub fn remove(&self, key: &CacheKey) -> bool {
        self.entries().remove(key.value()).is_some()
    }

    pub fn evict_all(&self) {
        self.entries().clear();
        debug!("cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
