//! Search requests.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::LanguageProfile;
use crate::events::DeliveryChannel;

/// A search accepted from a subscriber.
///
/// Immutable once built; the session handle is where every event for this
/// request is delivered.
#[derive(Clone)]
pub struct SearchRequest {
    id: Uuid,
    query: String,
    language_code: String,
    session: Arc<dyn DeliveryChannel>,
}

impl SearchRequest {
    /// Creates a new request bound to a delivery session.
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        language_code: impl Into<String>,
        session: Arc<dyn DeliveryChannel>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            language_code: language_code.into(),
            session,
        }
    }

    /// Unique id used to correlate log lines.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The raw search term.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The language code exactly as submitted.
    #[must_use]
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// The resolved language profile.
    #[must_use]
    pub fn profile(&self) -> LanguageProfile {
        LanguageProfile::resolve(&self.language_code)
    }

    /// Whether the search term is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// The session receiving this request's events.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn DeliveryChannel> {
        &self.session
    }
}

impl fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("id", &self.id)
            .field("query", &self.query)
            .field("language_code", &self.language_code)
            .finish_non_exhaustive()
    }
}
