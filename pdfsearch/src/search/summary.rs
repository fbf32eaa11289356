//! Per-request counters.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::core::SearchRequest;
use crate::validation::Confidence;

/// What happened during one search, logged when the request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    /// Request id.
    pub request_id: Uuid,
    /// Resolved language code.
    pub language: String,
    /// When the request started.
    pub started_at: DateTime<Utc>,
    /// When the request finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Whether the results were replayed from the cache.
    pub from_cache: bool,
    /// Provider pages that answered.
    pub pages_fetched: usize,
    /// Provider pages that failed and were skipped.
    pub pages_failed: usize,
    /// Raw candidates received.
    pub candidates: usize,
    /// Candidates skipped because their link was already seen.
    pub duplicates: usize,
    /// Candidates confirmed by the server.
    pub confirmed: usize,
    /// Candidates accepted by extension.
    pub heuristic: usize,
    /// Candidates rejected.
    pub rejected: usize,
    /// Results emitted to the subscriber.
    pub emitted: usize,
}

impl SearchSummary {
    /// Starts a summary for a request.
    #[must_use]
    pub fn start(request: &SearchRequest) -> Self {
        Self {
            request_id: request.id(),
            language: request.profile().code.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            from_cache: false,
            pages_fetched: 0,
            pages_failed: 0,
            candidates: 0,
            duplicates: 0,
            confirmed: 0,
            heuristic: 0,
            rejected: 0,
            emitted: 0,
        }
    }

    /// Records a cache hit replaying `count` results.
    pub fn record_cache_hit(&mut self, count: usize) {
        self.from_cache = true;
        self.emitted = count;
    }

    /// Records a page of `count` candidates.
    pub fn record_page(&mut self, count: usize) {
        self.pages_fetched += 1;
        self.candidates += count;
    }

    /// Records a skipped page.
    pub fn record_page_failure(&mut self) {
        self.pages_failed += 1;
    }

    /// Records a duplicate candidate.
    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    /// Records a validation outcome. Accepted candidates count as emitted.
    pub fn record_outcome(&mut self, confidence: Option<Confidence>) {
        match confidence {
            Some(Confidence::Confirmed) => self.confirmed += 1,
            Some(Confidence::Heuristic) => self.heuristic += 1,
            None => {
                self.rejected += 1;
                return;
            }
        }
        self.emitted += 1;
    }

    /// Marks the summary finished.
    #[must_use]
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Elapsed milliseconds, if finished.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    /// Message carried by the `search_complete` event.
    #[must_use]
    pub fn message(&self) -> String {
        match self.emitted {
            1 => "Search finished: 1 PDF found".to_string(),
            n => format!("Search finished: {n} PDFs found"),
        }
    }

    /// Logs the summary at info level.
    pub fn log(&self) {
        info!(
            request_id = %self.request_id,
            language = %self.language,
            from_cache = self.from_cache,
            pages_fetched = self.pages_fetched,
            pages_failed = self.pages_failed,
            candidates = self.candidates,
            duplicates = self.duplicates,
            confirmed = self.confirmed,
            heuristic = self.heuristic,
            rejected = self.rejected,
            emitted = self.emitted,
            duration_ms = self.duration_ms(),
            "Search complete"
        );
    }
}
