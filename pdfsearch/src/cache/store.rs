//! Key-value store protocol and an in-memory implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::errors::CacheError;

/// Protocol for the string key-value store backing the result cache.
///
/// Stores have an explicit lifecycle: [`connect`](Self::connect) before first
/// use and [`close`](Self::close) on shutdown. Operations on a store that is
/// not connected fail with [`CacheError::Unavailable`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Opens the connection. Connecting twice is a no-op.
    async fn connect(&self) -> Result<(), CacheError>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), CacheError>;

    /// Whether the store is connected.
    fn is_connected(&self) -> bool;

    /// Round-trips to the store.
    async fn ping(&self) -> Result<(), CacheError>;

    /// Gets a value by key. Expired entries are absent.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Sets a value that expires after `ttl`, replacing any previous value.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Deletes a value.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

struct StoredValue {
    value: String,
    expires_at: Instant,
}

impl StoredValue {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Process-local store with per-entry expiry.
pub struct InMemoryCacheStore {
    entries: DashMap<String, StoredValue>,
    connected: AtomicBool,
}

impl InMemoryCacheStore {
    /// Creates a new store. It must be connected before use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            connected: AtomicBool::new(false),
        }
    }

    /// Creates a store that is already connected.
    #[must_use]
    pub fn connected() -> Self {
        let store = Self::new();
        store.connected.store(true, Ordering::SeqCst);
        store
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_expired()).count()
    }

    /// Returns true if the store holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining lifetime of a key, if present.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.expires_at.saturating_duration_since(Instant::now()))
    }

    fn ensure_connected(&self) -> Result<(), CacheError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(CacheError::unavailable("store is not connected"))
        }
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCacheStore")
            .field("entries", &self.entries.len())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn connect(&self) -> Result<(), CacheError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.ensure_connected()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.ensure_connected()?;

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
        }
        // A concurrent `set` may have replaced the expired entry.
        self.entries.remove_if(key, |_, v| v.is_expired());
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.ensure_connected()?;
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(CacheError::InvalidTtl(ttl))?;
        self.entries
            .insert(key.to_string(), StoredValue { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.ensure_connected()?;
        self.entries.remove(key);
        Ok(())
    }
}
