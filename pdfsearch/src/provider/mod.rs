//! Search provider access.
//!
//! The orchestrator pages through results via the [`PageFetcher`] protocol.
//! [`SerpApiFetcher`] implements it against SerpApi's Google engine.

mod query;
#[cfg(feature = "serpapi")]
mod serpapi;

pub use query::{ProviderQuery, FILETYPE_RESTRICTION};
#[cfg(feature = "serpapi")]
pub use serpapi::SerpApiFetcher;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::core::{LanguageProfile, RawResultItem};
use crate::errors::ProviderError;

/// Protocol for fetching one page of raw search results.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches page `page_index` (zero-based) of `page_size` results.
    ///
    /// Returns an empty list when the provider has no organic results for the
    /// page, and an error when the provider reports one.
    async fn fetch_page(
        &self,
        query: &str,
        profile: &LanguageProfile,
        page_index: usize,
        page_size: usize,
    ) -> Result<Vec<RawResultItem>, ProviderError>;

    /// Whether the provider credential is configured.
    fn has_credential(&self) -> bool {
        true
    }
}
