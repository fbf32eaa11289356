//! # pdfsearch
//!
//! Web search for retrievable PDF documents.
//!
//! A search runs as a pipeline with:
//!
//! - **Cache lookup**: repeated queries are replayed from a TTL cache
//! - **Paginated fetching**: up to three provider pages, strictly in order
//! - **Hybrid validation**: a `HEAD` probe per link with an extension fallback
//! - **Incremental delivery**: each accepted PDF is emitted as soon as it is known
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pdfsearch::prelude::*;
//!
//! let config = AppConfig::from_env();
//! let fetcher = Arc::new(SerpApiFetcher::new(config.serpapi.clone())?);
//! let validator = LinkValidator::new(Arc::new(HttpLinkProbe::new(&config.probe)?));
//! let cache = ResultCache::from_config(Arc::new(InMemoryCacheStore::connected()), &config.search);
//!
//! let handler = SearchHandler::new(Arc::new(PdfSearchService::new(
//!     fetcher, validator, cache, config.search,
//! )));
//! handler.on_search_pdfs("linear algebra", Some("en"), Arc::new(LoggingChannel::default())).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cache;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod health;
pub mod observability;
pub mod provider;
pub mod search;
pub mod testing;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::{cache_key, CacheStore, InMemoryCacheStore, ResultCache};
    pub use crate::config::{AppConfig, ProbeConfig, SearchConfig, SerpApiConfig};
    pub use crate::core::{
        LanguageProfile, RawResultItem, SearchEvent, SearchRequest, ValidatedResult,
    };
    pub use crate::errors::{CacheError, ProviderError, SearchError};
    pub use crate::events::{
        CollectingChannel, DeliveryChannel, LoggingChannel, NoOpChannel, SessionChannel,
    };
    pub use crate::health::HealthStatus;
    pub use crate::provider::PageFetcher;
    #[cfg(feature = "serpapi")]
    pub use crate::provider::SerpApiFetcher;
    pub use crate::search::{PdfSearchService, SearchHandler, SearchSummary};
    pub use crate::validation::{HttpLinkProbe, LinkProbe, LinkValidator};
}
