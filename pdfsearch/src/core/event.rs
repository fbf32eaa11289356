//! Events streamed to a search subscriber.

use serde::{Deserialize, Serialize};

use super::ValidatedResult;

/// An event delivered to the session that requested a search.
///
/// Serializes to the wire form `{"event": <name>, "payload": <payload>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum SearchEvent {
    /// One validated PDF, streamed as soon as it is confirmed.
    NewPdf(ValidatedResult),
    /// Terminal success marker.
    SearchComplete {
        /// Human-readable summary.
        message: String,
    },
    /// Terminal or precondition failure marker.
    Error(String),
}

impl SearchEvent {
    /// Event name of a streamed result.
    pub const NEW_PDF: &'static str = "new_pdf";
    /// Event name of the success marker.
    pub const SEARCH_COMPLETE: &'static str = "search_complete";
    /// Event name of the failure marker.
    pub const ERROR: &'static str = "error";

    /// Creates a completion event.
    #[must_use]
    pub fn complete(message: impl Into<String>) -> Self {
        Self::SearchComplete {
            message: message.into(),
        }
    }

    /// Creates an error event.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// The event name as seen by a socket subscriber.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NewPdf(_) => Self::NEW_PDF,
            Self::SearchComplete { .. } => Self::SEARCH_COMPLETE,
            Self::Error(_) => Self::ERROR,
        }
    }

    /// The event payload as JSON.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::NewPdf(result) => serde_json::to_value(result).unwrap_or_default(),
            Self::SearchComplete { message } => serde_json::json!({ "message": message }),
            Self::Error(message) => serde_json::json!(message),
        }
    }

    /// Whether this event ends the request.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::NewPdf(_))
    }

    /// The streamed result, if any.
    #[must_use]
    pub const fn as_result(&self) -> Option<&ValidatedResult> {
        match self {
            Self::NewPdf(result) => Some(result),
            _ => None,
        }
    }
}
