//! Configuration types for searching, probing and the search provider.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{Result, SearchError};

/// Environment variable holding the SerpApi key.
pub const SERPAPI_KEY_ENV: &str = "SERPAPI_KEY";

/// Environment variable overriding the SerpApi endpoint.
pub const SERPAPI_BASE_URL_ENV: &str = "SERPAPI_BASE_URL";

/// Configuration for the search orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of provider pages fetched per search.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Number of results requested per page.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: usize,
    /// Lifetime of a cached result set.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Prefix of every cache key.
    #[serde(default = "default_cache_key_prefix")]
    pub cache_key_prefix: String,
    /// Upper bound on concurrent probes within one page.
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,
}

fn default_max_pages() -> usize {
    3
}

fn default_results_per_page() -> usize {
    20
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_key_prefix() -> String {
    "pdf_search".to_string()
}

fn default_max_concurrent_probes() -> usize {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            results_per_page: default_results_per_page(),
            cache_ttl_seconds: default_cache_ttl(),
            cache_key_prefix: default_cache_key_prefix(),
            max_concurrent_probes: default_max_concurrent_probes(),
        }
    }
}

impl SearchConfig {
    /// Creates a new search configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of pages.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_results_per_page(mut self, results_per_page: usize) -> Self {
        self.results_per_page = results_per_page;
        self
    }

    /// Sets the cache TTL.
    #[must_use]
    pub fn with_cache_ttl_seconds(mut self, ttl: u64) -> Self {
        self.cache_ttl_seconds = ttl;
        self
    }

    /// Sets the per-page probe concurrency.
    #[must_use]
    pub fn with_max_concurrent_probes(mut self, max: usize) -> Self {
        self.max_concurrent_probes = max;
        self
    }

    /// Gets the cache TTL as a Duration.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

/// Configuration for the HEAD probe used by link validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-probe timeout in milliseconds.
    #[serde(default = "default_probe_timeout")]
    pub timeout_ms: u64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_probe_timeout() -> u64 {
    3000
}

fn default_max_redirects() -> usize {
    2
}

fn default_user_agent() -> String {
    concat!("pdfsearch/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    /// Creates a new probe configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the redirect cap.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Configuration for the SerpApi search provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpApiConfig {
    /// API key; searches are refused when absent.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Search endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Provider engine name.
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Request timeout in seconds.
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://serpapi.com/search.json".to_string()
}

fn default_engine() -> String {
    "google".to_string()
}

fn default_provider_timeout() -> u64 {
    30
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            engine: default_engine(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl std::fmt::Debug for SerpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("engine", &self.engine)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl SerpApiConfig {
    /// Creates a new provider configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the key and optional endpoint override from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(SERPAPI_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: std::env::var(SERPAPI_BASE_URL_ENV).unwrap_or_else(|_| default_base_url()),
            ..Self::default()
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a non-blank API key is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Combined configuration for a search process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Orchestrator configuration.
    #[serde(default)]
    pub search: SearchConfig,
    /// Link probe configuration.
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Provider configuration.
    #[serde(default)]
    pub serpapi: SerpApiConfig,
}

impl AppConfig {
    /// Creates a configuration with defaults and provider settings from the
    /// environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            serpapi: SerpApiConfig::from_env(),
            ..Self::default()
        }
    }

    /// Parses a JSON configuration document; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SearchError::internal(format!("invalid configuration: {e}")))
    }
}
