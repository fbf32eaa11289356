//! Inbound `search_pdfs` trigger.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use super::PdfSearchService;
use crate::core::{SearchEvent, SearchRequest, ValidatedResult, DEFAULT_LANGUAGE};
use crate::errors::{Result, SearchError};
use crate::events::DeliveryChannel;

/// Entry point a transport calls when a subscriber sends `search_pdfs`.
///
/// Every accepted trigger ends with exactly one terminal event on the
/// session: `search_complete` from the service, or `error` from here.
#[derive(Debug, Clone)]
pub struct SearchHandler {
    service: Arc<PdfSearchService>,
}

impl SearchHandler {
    /// Creates a handler over a service.
    #[must_use]
    pub const fn new(service: Arc<PdfSearchService>) -> Self {
        Self { service }
    }

    /// The wrapped service.
    #[must_use]
    pub const fn service(&self) -> &Arc<PdfSearchService> {
        &self.service
    }

    /// Handles one `search_pdfs` message.
    ///
    /// Precondition failures are reported synchronously before any work.
    /// The search itself runs on its own task so a panic inside it still
    /// ends in an `error` event.
    pub async fn on_search_pdfs(
        &self,
        query: &str,
        language: Option<&str>,
        session: Arc<dyn DeliveryChannel>,
    ) -> Result<Vec<ValidatedResult>> {
        let request = SearchRequest::new(
            query,
            language.unwrap_or(DEFAULT_LANGUAGE),
            Arc::clone(&session),
        );

        if let Err(err) = self.service.check_preconditions(&request) {
            warn!(request_id = %request.id(), error = %err, "Rejected search request");
            session.try_emit(SearchEvent::error(err.client_message()));
            return Err(err);
        }

        let service = Arc::clone(&self.service);
        let outcome = tokio::spawn(async move { service.run(&request).await })
            .await
            .unwrap_or_else(|join_err| Err(SearchError::internal(join_err.to_string())));

        if let Err(err) = &outcome {
            error!(error = %err, "Search failed");
            session.emit(SearchEvent::error(err.client_message())).await;
        }
        outcome
    }

    /// Handles a trigger in the background, as a socket server does.
    pub fn spawn(
        &self,
        query: impl Into<String>,
        language: Option<String>,
        session: Arc<dyn DeliveryChannel>,
    ) -> JoinHandle<Result<Vec<ValidatedResult>>> {
        let handler = self.clone();
        let query = query.into();
        tokio::spawn(async move {
            handler
                .on_search_pdfs(&query, language.as_deref(), session)
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{InMemoryCacheStore, ResultCache};
    use crate::config::SearchConfig;
    use crate::core::{LanguageProfile, RawResultItem};
    use crate::errors::ProviderError;
    use crate::events::{CollectingChannel, SessionChannel};
    use crate::provider::PageFetcher;
    use crate::testing::{pdf_item, ScriptedPageFetcher, StaticLinkProbe};
    use crate::validation::LinkValidator;
    use async_trait::async_trait;

    fn handler(fetcher: Arc<dyn PageFetcher>) -> SearchHandler {
        let config = SearchConfig::default();
        let cache = ResultCache::from_config(Arc::new(InMemoryCacheStore::connected()), &config);
        let validator = LinkValidator::new(Arc::new(StaticLinkProbe::new()));
        SearchHandler::new(Arc::new(PdfSearchService::new(
            fetcher, validator, cache, config,
        )))
    }

    struct PanickingFetcher;

    #[async_trait]
    impl PageFetcher for PanickingFetcher {
        async fn fetch_page(
            &self,
            _query: &str,
            _profile: &LanguageProfile,
            _page_index: usize,
            _page_size: usize,
        ) -> std::result::Result<Vec<RawResultItem>, ProviderError> {
            panic!("provider client bug")
        }
    }

    #[tokio::test]
    async fn test_empty_query_emits_single_error() {
        let fetcher = Arc::new(ScriptedPageFetcher::new().page(vec![pdf_item(1)]));
        let handler = handler(fetcher.clone());
        let channel = Arc::new(CollectingChannel::new());

        let outcome = handler.on_search_pdfs("", None, channel.clone()).await;

        assert!(matches!(outcome, Err(SearchError::EmptyQuery)));
        assert_eq!(
            channel.events(),
            vec![SearchEvent::error("Search key missing or empty search term.")]
        );
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_emits_error() {
        let handler = handler(Arc::new(ScriptedPageFetcher::new().without_credential()));
        let channel = Arc::new(CollectingChannel::new());

        let outcome = handler.on_search_pdfs("rust", Some("en"), channel.clone()).await;

        assert!(outcome.is_err());
        assert_eq!(channel.names(), vec!["error"]);
    }

    #[tokio::test]
    async fn test_success_ends_with_completion() {
        let handler = handler(Arc::new(ScriptedPageFetcher::new().page(vec![pdf_item(1)])));
        let channel = Arc::new(CollectingChannel::new());

        let results = handler
            .on_search_pdfs("rust", Some("pt-BR"), channel.clone())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(channel.names(), vec!["new_pdf", "search_complete"]);
    }

    #[tokio::test]
    async fn test_unexpected_failure_emits_error_without_completion() {
        let handler = handler(Arc::new(PanickingFetcher));
        let channel = Arc::new(CollectingChannel::new());

        let outcome = handler.on_search_pdfs("rust", None, channel.clone()).await;

        assert!(matches!(outcome, Err(SearchError::Internal(_))));
        assert_eq!(channel.names(), vec!["error"]);
    }

    #[tokio::test]
    async fn test_spawned_search_streams_to_session() {
        let handler = handler(Arc::new(
            ScriptedPageFetcher::new().page(vec![pdf_item(1), pdf_item(2)]),
        ));
        let (channel, mut receiver) = SessionChannel::new("socket-1");

        let task = handler.spawn("rust", None, Arc::new(channel));

        let mut names = Vec::new();
        while let Some(event) = receiver.recv().await {
            names.push(event.name());
            if event.is_terminal() {
                break;
            }
        }
        assert_eq!(names, vec!["new_pdf", "new_pdf", "search_complete"]);
        assert_eq!(task.await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_disconnected_session_does_not_abort_search() {
        let handler = handler(Arc::new(ScriptedPageFetcher::new().page(vec![pdf_item(1)])));
        let (channel, receiver) = SessionChannel::new("socket-2");
        drop(receiver);

        let results = handler
            .on_search_pdfs("rust", None, Arc::new(channel))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
    }
}
