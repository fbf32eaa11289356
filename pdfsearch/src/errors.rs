//! Error types for the PDF search pipeline.
//!
//! The taxonomy mirrors how failures are handled at runtime:
//!
//! - Precondition failures ([`SearchError::EmptyQuery`],
//!   [`SearchError::MissingCredential`]) abort a request before any work.
//! - [`ProviderError`] is recoverable per page: the orchestrator skips the page.
//! - [`CacheError`] is recoverable per operation: reads become misses and
//!   writes are dropped.
//! - [`SearchError::Internal`] covers everything else and terminates the
//!   request with a single `error` event.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// The main error type for search requests.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search term was missing or blank.
    #[error("search term is empty")]
    EmptyQuery,

    /// No provider credential is configured.
    #[error("search provider credential is not configured")]
    MissingCredential,

    /// The search provider failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The cache store failed.
    #[error("{0}")]
    Cache(#[from] CacheError),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error was raised by a precondition check.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::MissingCredential)
    }

    /// Message delivered to the subscriber in an `error` event.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.is_precondition() {
            "Search key missing or empty search term.".to_string()
        } else {
            format!("Search failed: {self}")
        }
    }
}

/// Errors reported while fetching one page of provider results.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider answered with an error payload.
    #[error("Provider error: {0}")]
    Api(String),

    /// The provider answered with a non-success status.
    #[error("Provider returned HTTP {status}")]
    Http {
        /// The HTTP status code.
        status: u16,
    },

    /// The request never produced a response.
    #[error("Provider transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Provider response could not be decoded: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Creates an API error.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

/// Errors raised by a cache store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The store could not be reached or is not connected.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A payload could not be encoded or decoded.
    #[error("Cache serialization error: {0}")]
    Serialization(String),

    /// The requested lifetime cannot be represented.
    #[error("Cache TTL out of range: {0:?}")]
    InvalidTtl(Duration),
}

impl CacheError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        assert!(SearchError::EmptyQuery.is_precondition());
        assert!(SearchError::MissingCredential.is_precondition());
        assert!(!SearchError::internal("boom").is_precondition());
        assert!(!SearchError::from(ProviderError::api("quota")).is_precondition());
    }

    #[test]
    fn test_client_message() {
        assert_eq!(
            SearchError::EmptyQuery.client_message(),
            "Search key missing or empty search term."
        );
        assert_eq!(
            SearchError::internal("bad state").client_message(),
            "Search failed: Internal error: bad state"
        );
    }

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::api("Invalid API key").to_string(),
            "Provider error: Invalid API key"
        );
        assert_eq!(
            ProviderError::Http { status: 429 }.to_string(),
            "Provider returned HTTP 429"
        );
    }

    #[test]
    fn test_cache_error_from_serde() {
        let err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let cache_err = CacheError::from(err);
        assert!(matches!(cache_err, CacheError::Serialization(_)));
    }
}
