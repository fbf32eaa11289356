//! Result cache keyed by normalised query and language.
//!
//! Values are JSON arrays of [`ValidatedResult`] written wholesale with a
//! TTL. The cache is best effort: store failures and malformed payloads are
//! logged and behave like a miss (reads) or a no-op (writes). Concurrent
//! writers for the same key are not coordinated; the last write wins.

mod store;

pub use store::{CacheStore, InMemoryCacheStore};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::core::ValidatedResult;
use crate::errors::CacheError;

/// Builds the cache key `<prefix>:<language>:<lowercase(trim(query))>`.
#[must_use]
pub fn cache_key(prefix: &str, language_code: &str, query: &str) -> String {
    format!("{prefix}:{language_code}:{}", query.trim().to_lowercase())
}

/// Typed, failure-tolerant view over a [`CacheStore`].
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
    prefix: String,
    ttl: Duration,
}

impl ResultCache {
    /// Creates a cache over a store.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            ttl,
        }
    }

    /// Creates a cache using the prefix and TTL from a search configuration.
    #[must_use]
    pub fn from_config(store: Arc<dyn CacheStore>, config: &SearchConfig) -> Self {
        Self::new(store, config.cache_key_prefix.clone(), config.cache_ttl())
    }

    /// The key under which a query's results are stored.
    #[must_use]
    pub fn key(&self, language_code: &str, query: &str) -> String {
        cache_key(&self.prefix, language_code, query)
    }

    /// The TTL applied on write.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Reads a cached result set, surfacing store and decode errors.
    pub async fn try_get(&self, key: &str) -> Result<Option<Vec<ValidatedResult>>, CacheError> {
        match self.store.get(key).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Reads a cached result set; any failure is logged and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<Vec<ValidatedResult>> {
        match self.try_get(key).await {
            Ok(hit) => hit,
            Err(err) => {
                warn!(key, error = %err, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Writes a result set, surfacing store and encode errors.
    pub async fn try_put(&self, key: &str, results: &[ValidatedResult]) -> Result<(), CacheError> {
        let payload = serde_json::to_string(results)?;
        self.store.set(key, payload, self.ttl).await
    }

    /// Writes a non-empty result set. Returns whether the entry was stored.
    ///
    /// Empty sets are skipped so a transient zero-result page does not stick
    /// for a full TTL. Failures are logged and dropped.
    pub async fn put(&self, key: &str, results: &[ValidatedResult]) -> bool {
        if results.is_empty() {
            debug!(key, "Skipping cache write for empty result set");
            return false;
        }

        match self.try_put(key, results).await {
            Ok(()) => {
                debug!(key, count = results.len(), ttl_seconds = self.ttl.as_secs(), "Cached results");
                true
            }
            Err(err) => {
                warn!(key, error = %err, "Cache write failed, dropping");
                false
            }
        }
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("prefix", &self.prefix)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
