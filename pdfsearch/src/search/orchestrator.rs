//! Search orchestration: cache check, pagination, fan-out, write-back.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::SearchSummary;
use crate::cache::ResultCache;
use crate::config::SearchConfig;
use crate::core::{RawResultItem, SearchEvent, SearchRequest, ValidatedResult};
use crate::errors::{Result, SearchError};
use crate::events::DeliveryChannel;
use crate::provider::PageFetcher;
use crate::validation::LinkValidator;

/// Runs searches end to end.
///
/// A run moves through `CacheCheck -> Paginating -> Validating ->
/// Aggregating -> CacheWrite -> Complete`. Pages are fetched strictly one
/// after another; the candidates of a page are validated concurrently and
/// the page is drained before the next one is requested.
#[derive(Clone)]
pub struct PdfSearchService {
    fetcher: Arc<dyn PageFetcher>,
    validator: LinkValidator,
    cache: ResultCache,
    config: SearchConfig,
}

impl PdfSearchService {
    /// Creates a service from its collaborators.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        validator: LinkValidator,
        cache: ResultCache,
        config: SearchConfig,
    ) -> Self {
        Self {
            fetcher,
            validator,
            cache,
            config,
        }
    }

    /// The search configuration.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The result cache.
    #[must_use]
    pub const fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Rejects requests that must not start any work.
    pub fn check_preconditions(&self, request: &SearchRequest) -> Result<()> {
        if request.is_blank() {
            return Err(SearchError::EmptyQuery);
        }
        if !self.fetcher.has_credential() {
            return Err(SearchError::MissingCredential);
        }
        Ok(())
    }

    /// Runs a search, streaming every result to the request's session.
    ///
    /// On success the session has received one `new_pdf` per returned result
    /// followed by `search_complete`. Errors are returned without emitting
    /// anything; reporting them is the caller's job.
    pub async fn run(&self, request: &SearchRequest) -> Result<Vec<ValidatedResult>> {
        self.check_preconditions(request)?;

        let profile = request.profile();
        let key = self.cache.key(profile.code, request.query());
        let session = request.session();
        let mut summary = SearchSummary::start(request);

        info!(
            request_id = %request.id(),
            query = %request.query(),
            language = profile.code,
            "Starting search"
        );

        if let Some(cached) = self.cache.get(&key).await {
            info!(request_id = %request.id(), key = %key, count = cached.len(), "Serving from cache");
            for result in &cached {
                session.emit(SearchEvent::NewPdf(result.clone())).await;
            }
            summary.record_cache_hit(cached.len());
            Self::complete(session.as_ref(), summary).await;
            return Ok(cached);
        }

        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for page_index in 0..self.config.max_pages {
            let items = match self
                .fetcher
                .fetch_page(
                    request.query(),
                    &profile,
                    page_index,
                    self.config.results_per_page,
                )
                .await
            {
                Ok(items) => items,
                Err(err) => {
                    warn!(
                        request_id = %request.id(),
                        page = page_index,
                        error = %err,
                        "Provider page failed, skipping"
                    );
                    summary.record_page_failure();
                    continue;
                }
            };

            summary.record_page(items.len());
            if items.is_empty() {
                debug!(request_id = %request.id(), page = page_index, "Empty page, stopping");
                break;
            }

            self.validate_page(
                items,
                &mut seen,
                &mut results,
                session.as_ref(),
                &mut summary,
            )
            .await;
        }

        self.cache.put(&key, &results).await;
        Self::complete(session.as_ref(), summary).await;
        Ok(results)
    }

    /// Validates one page, emitting accepted results in provider order.
    async fn validate_page(
        &self,
        items: Vec<RawResultItem>,
        seen: &mut HashSet<String>,
        results: &mut Vec<ValidatedResult>,
        session: &dyn DeliveryChannel,
        summary: &mut SearchSummary,
    ) {
        let fresh: Vec<RawResultItem> = items
            .into_iter()
            .filter(|item| {
                let is_new = seen.insert(item.link.clone());
                if !is_new {
                    summary.record_duplicate();
                }
                is_new
            })
            .collect();

        let validator = &self.validator;
        let mut validated = stream::iter(fresh)
            .map(|item| async move {
                let outcome = validator.validate(&item.link).await;
                (item, outcome)
            })
            .buffered(self.config.max_concurrent_probes.max(1));

        while let Some((item, outcome)) = validated.next().await {
            summary.record_outcome(outcome.as_ref().map(|o| o.confidence));
            let Some(outcome) = outcome else {
                continue;
            };

            let result = ValidatedResult::from_raw(item, outcome.size);
            session.emit(SearchEvent::NewPdf(result.clone())).await;
            results.push(result);
        }
    }

    async fn complete(session: &dyn DeliveryChannel, summary: SearchSummary) {
        let summary = summary.finish();
        summary.log();
        session.emit(SearchEvent::complete(summary.message())).await;
    }
}

impl std::fmt::Debug for PdfSearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSearchService")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheStore;
    use crate::core::LanguageProfile;
    use crate::errors::ProviderError;
    use crate::events::CollectingChannel;
    use crate::provider::MockPageFetcher;
    use crate::testing::{
        pdf_item, sample_result, FailingCacheStore, ScriptedPageFetcher, StaticLinkProbe,
    };
    use crate::validation::{ProbeFailure, ProbeResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn service_with(fetcher: Arc<dyn PageFetcher>, probe: StaticLinkProbe) -> PdfSearchService {
        let config = SearchConfig::default();
        let cache = ResultCache::from_config(Arc::new(InMemoryCacheStore::connected()), &config);
        PdfSearchService::new(fetcher, LinkValidator::new(Arc::new(probe)), cache, config)
    }

    fn service_sharing(
        fetcher: Arc<dyn PageFetcher>,
        probe: Arc<StaticLinkProbe>,
        config: SearchConfig,
    ) -> PdfSearchService {
        let cache = ResultCache::from_config(Arc::new(InMemoryCacheStore::connected()), &config);
        PdfSearchService::new(fetcher, LinkValidator::new(probe), cache, config)
    }

    /// Records how many probes had answered when each page was requested.
    struct BarrierFetcher {
        pages: Vec<Vec<RawResultItem>>,
        probe: Arc<StaticLinkProbe>,
        completed_at_fetch: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl PageFetcher for BarrierFetcher {
        async fn fetch_page(
            &self,
            _query: &str,
            _profile: &LanguageProfile,
            page_index: usize,
            _page_size: usize,
        ) -> std::result::Result<Vec<RawResultItem>, ProviderError> {
            self.completed_at_fetch
                .lock()
                .push(self.probe.completed_count());
            Ok(self.pages.get(page_index).cloned().unwrap_or_default())
        }
    }

    fn request(query: &str, channel: &Arc<CollectingChannel>) -> SearchRequest {
        SearchRequest::new(query, "en", channel.clone())
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_before_work() {
        let fetcher = Arc::new(ScriptedPageFetcher::new().page(vec![pdf_item(1)]));
        let service = service_with(fetcher.clone(), StaticLinkProbe::new());
        let channel = Arc::new(CollectingChannel::new());

        let err = service.run(&request("   ", &channel)).await.unwrap_err();

        assert!(matches!(err, SearchError::EmptyQuery));
        assert_eq!(fetcher.call_count(), 0);
        assert!(channel.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_is_rejected() {
        let fetcher = Arc::new(ScriptedPageFetcher::new().without_credential());
        let service = service_with(fetcher.clone(), StaticLinkProbe::new());
        let channel = Arc::new(CollectingChannel::new());

        let err = service.run(&request("rust", &channel)).await.unwrap_err();

        assert!(matches!(err, SearchError::MissingCredential));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_results_keep_provider_order_across_pages() {
        let fetcher = Arc::new(
            ScriptedPageFetcher::new()
                .page(vec![pdf_item(1), pdf_item(2)])
                .page(vec![pdf_item(3)]),
        );
        let probe = StaticLinkProbe::new().with_delay(Duration::from_millis(5));
        let service = service_with(fetcher.clone(), probe);
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert_eq!(
            results,
            vec![sample_result(1), sample_result(2), sample_result(3)]
        );
        assert_eq!(channel.results(), results);
        assert_eq!(
            channel.names(),
            vec!["new_pdf", "new_pdf", "new_pdf", "search_complete"]
        );
        // The third page was empty and stopped pagination.
        assert_eq!(fetcher.requested_pages(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_duplicates_are_not_revalidated() {
        let fetcher = Arc::new(
            ScriptedPageFetcher::new()
                .page(vec![pdf_item(1), pdf_item(1)])
                .page(vec![pdf_item(1), pdf_item(2)]),
        );
        let probe = Arc::new(StaticLinkProbe::new());
        let config = SearchConfig::default();
        let cache = ResultCache::from_config(Arc::new(InMemoryCacheStore::connected()), &config);
        let service = PdfSearchService::new(fetcher, LinkValidator::new(probe.clone()), cache, config);
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert_eq!(results, vec![sample_result(1), sample_result(2)]);
        assert_eq!(probe.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_is_skipped() {
        let fetcher = Arc::new(
            ScriptedPageFetcher::new()
                .failing_page(ProviderError::Http { status: 503 })
                .page(vec![pdf_item(2)]),
        );
        let service = service_with(fetcher.clone(), StaticLinkProbe::new());
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert_eq!(results, vec![sample_result(2)]);
        assert_eq!(channel.names().last(), Some(&"search_complete"));
    }

    #[tokio::test]
    async fn test_rejected_links_are_not_emitted() {
        let html = RawResultItem::new("Page", "https://docs.example/page", "");
        let fetcher = Arc::new(ScriptedPageFetcher::new().page(vec![html.clone(), pdf_item(1)]));
        let probe = StaticLinkProbe::new()
            .respond(html.link.clone(), Err(ProbeFailure::Timeout))
            .respond(
                pdf_item(1).link,
                Ok(ProbeResponse::with_status(200)
                    .content_type("application/pdf")
                    .content_length(1_572_864)),
            );
        let service = service_with(fetcher, probe);
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].size, "1.50 MB");
    }

    #[tokio::test]
    async fn test_second_run_is_served_from_cache() {
        let fetcher = Arc::new(ScriptedPageFetcher::new().page(vec![pdf_item(1), pdf_item(2)]));
        let service = service_with(fetcher.clone(), StaticLinkProbe::new());

        let first = Arc::new(CollectingChannel::new());
        let fresh = service.run(&request("Rust", &first)).await.unwrap();
        let calls = fetcher.call_count();

        let second = Arc::new(CollectingChannel::new());
        let cached = service.run(&request("  rust ", &second)).await.unwrap();

        assert_eq!(cached, fresh);
        assert_eq!(fetcher.call_count(), calls);
        assert_eq!(second.results(), fresh);
        assert_eq!(second.names().last(), Some(&"search_complete"));
    }

    #[tokio::test]
    async fn test_empty_search_is_not_cached() {
        let fetcher = Arc::new(ScriptedPageFetcher::new());
        let service = service_with(fetcher, StaticLinkProbe::new());
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("nothing", &channel)).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(channel.names(), vec!["search_complete"]);
        let key = service.cache().key("en", "nothing");
        assert!(service.cache().get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_mock_fetcher_receives_paging_parameters() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_has_credential().return_const(true);
        fetcher
            .expect_fetch_page()
            .times(3)
            .returning(|query, profile, page, size| {
                assert_eq!(query, "rust");
                assert_eq!(profile.code, "en");
                assert_eq!(size, 20);
                Ok(vec![pdf_item(page)])
            });

        let service = service_with(Arc::new(fetcher), StaticLinkProbe::new());
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert_eq!(
            results,
            vec![sample_result(0), sample_result(1), sample_result(2)]
        );
    }

    #[tokio::test]
    async fn test_all_pages_failing_still_completes() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_has_credential().return_const(true);
        fetcher
            .expect_fetch_page()
            .times(3)
            .returning(|_, _, _, _| Err(ProviderError::api("Invalid API key.")));

        let service = service_with(Arc::new(fetcher), StaticLinkProbe::new());
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(channel.names(), vec!["search_complete"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_is_validated_concurrently() {
        let items: Vec<RawResultItem> = (0..20).map(pdf_item).collect();
        let fetcher = Arc::new(ScriptedPageFetcher::new().page(items));
        let probe = StaticLinkProbe::new().with_delay(Duration::from_millis(100));
        let service = service_with(fetcher, probe);
        let channel = Arc::new(CollectingChannel::new());

        let started = tokio::time::Instant::now();
        let results = service.run(&request("rust", &channel)).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(results.len(), 20);
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(200), "took {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_probes_are_bounded() {
        let items: Vec<RawResultItem> = (0..20).map(pdf_item).collect();
        let fetcher = Arc::new(ScriptedPageFetcher::new().page(items));
        let probe = Arc::new(StaticLinkProbe::new().with_delay(Duration::from_millis(100)));
        let config = SearchConfig::default().with_max_concurrent_probes(5);
        let service = service_sharing(fetcher, probe, config);
        let channel = Arc::new(CollectingChannel::new());

        let started = tokio::time::Instant::now();
        service.run(&request("rust", &channel)).await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(400), "took {elapsed:?}");
        assert!(elapsed < Duration::from_millis(500), "took {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_page_waits_for_current_validations() {
        let probe = Arc::new(StaticLinkProbe::new().with_delay(Duration::from_millis(50)));
        let fetcher = Arc::new(BarrierFetcher {
            pages: vec![
                vec![pdf_item(1), pdf_item(2), pdf_item(3)],
                vec![pdf_item(4), pdf_item(5)],
            ],
            probe: probe.clone(),
            completed_at_fetch: Mutex::new(Vec::new()),
        });
        let service = service_sharing(fetcher.clone(), probe, SearchConfig::default());
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(*fetcher.completed_at_fetch.lock(), vec![0, 3, 5]);
    }

    #[tokio::test]
    async fn test_unreachable_cache_still_completes() {
        let fetcher = Arc::new(ScriptedPageFetcher::new().page(vec![pdf_item(1), pdf_item(2)]));
        let config = SearchConfig::default();
        let cache = ResultCache::from_config(Arc::new(FailingCacheStore), &config);
        let service = PdfSearchService::new(
            fetcher,
            LinkValidator::new(Arc::new(StaticLinkProbe::new())),
            cache,
            config,
        );
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert_eq!(results, vec![sample_result(1), sample_result(2)]);
        assert_eq!(channel.names(), vec!["new_pdf", "new_pdf", "search_complete"]);
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_still_completes() {
        let fetcher = Arc::new(ScriptedPageFetcher::new().page(vec![pdf_item(1)]));
        let config = SearchConfig::default().with_cache_ttl_seconds(u64::MAX);
        let service = service_sharing(fetcher, Arc::new(StaticLinkProbe::new()), config);
        let channel = Arc::new(CollectingChannel::new());

        let results = service.run(&request("rust", &channel)).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(channel.names(), vec!["new_pdf", "search_complete"]);
    }
}
