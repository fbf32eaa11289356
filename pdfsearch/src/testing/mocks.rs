//! Scripted fakes for the pipeline's collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::cache::CacheStore;
use crate::core::{LanguageProfile, RawResultItem};
use crate::errors::{CacheError, ProviderError};
use crate::provider::PageFetcher;
use crate::validation::{LinkProbe, ProbeFailure, ProbeResult};

/// A page fetcher that replays a fixed script of pages.
///
/// Page `i` of the script answers the `i`-th page index; indices past the end
/// of the script answer with an empty page.
#[derive(Debug)]
pub struct ScriptedPageFetcher {
    pages: Vec<Result<Vec<RawResultItem>, ProviderError>>,
    credential: bool,
    calls: Mutex<Vec<usize>>,
}

impl ScriptedPageFetcher {
    /// Creates a fetcher with an empty script and a configured credential.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            credential: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Appends a page of results.
    #[must_use]
    pub fn page(mut self, items: Vec<RawResultItem>) -> Self {
        self.pages.push(Ok(items));
        self
    }

    /// Appends a failing page.
    #[must_use]
    pub fn failing_page(mut self, error: ProviderError) -> Self {
        self.pages.push(Err(error));
        self
    }

    /// Simulates a missing provider credential.
    #[must_use]
    pub fn without_credential(mut self) -> Self {
        self.credential = false;
        self
    }

    /// Returns the number of pages requested.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the requested page indices in order.
    #[must_use]
    pub fn requested_pages(&self) -> Vec<usize> {
        self.calls.lock().clone()
    }
}

impl Default for ScriptedPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for ScriptedPageFetcher {
    async fn fetch_page(
        &self,
        _query: &str,
        _profile: &LanguageProfile,
        page_index: usize,
        _page_size: usize,
    ) -> Result<Vec<RawResultItem>, ProviderError> {
        self.calls.lock().push(page_index);
        self.pages
            .get(page_index)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn has_credential(&self) -> bool {
        self.credential
    }
}

/// A probe answering from a fixed table.
///
/// URLs without an entry fail as unreachable.
#[derive(Debug, Default)]
pub struct StaticLinkProbe {
    responses: HashMap<String, ProbeResult>,
    delay: Option<Duration>,
    probed: Mutex<Vec<String>>,
    completed: AtomicUsize,
}

impl StaticLinkProbe {
    /// Creates an empty probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer for a URL.
    #[must_use]
    pub fn respond(mut self, url: impl Into<String>, result: ProbeResult) -> Self {
        self.responses.insert(url.into(), result);
        self
    }

    /// Delays every answer, to exercise concurrent validation.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns every probed URL in call order.
    #[must_use]
    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().clone()
    }

    /// Returns the number of probes issued.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.probed.lock().len()
    }

    /// Returns the number of probes that have answered.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkProbe for StaticLinkProbe {
    async fn probe(&self, url: &str) -> ProbeResult {
        self.probed.lock().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(ProbeFailure::Connect("unreachable".to_string())))
    }
}

/// A cache store whose every operation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn connect(&self) -> Result<(), CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn close(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        false
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }
}
