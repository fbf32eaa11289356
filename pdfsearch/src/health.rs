//! Health check payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cache::CacheStore;

/// Process status reported by every health check.
pub const API_OK: &str = "API OK";

/// State of the cache store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheState {
    /// The store answered a ping.
    Connected,
    /// The store did not answer.
    Disconnected,
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "CONNECTED"),
            Self::Disconnected => write!(f, "DISCONNECTED"),
        }
    }
}

/// Health payload: `{"status": "API OK", "cache": "CONNECTED"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always [`API_OK`] while the process serves requests.
    pub status: String,
    /// Cache store state.
    pub cache: CacheState,
}

impl HealthStatus {
    /// Probes the cache store and builds the payload.
    pub async fn check(store: &dyn CacheStore) -> Self {
        let cache = match store.ping().await {
            Ok(()) => CacheState::Connected,
            Err(err) => {
                tracing::warn!(error = %err, "Cache store did not answer ping");
                CacheState::Disconnected
            }
        };

        Self {
            status: API_OK.to_string(),
            cache,
        }
    }

    /// Whether every dependency is reachable.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.cache == CacheState::Connected
    }
}
