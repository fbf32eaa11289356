//! Search candidates and validated results.

use serde::{Deserialize, Serialize};

/// Size marker used when a server does not report a content length.
pub const UNKNOWN_SIZE: &str = "unknown";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Formats a byte count as megabytes with two decimals (e.g. `"1.50 MB"`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

/// A candidate returned by the search provider.
///
/// Only lives for the duration of one page: it is validated and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResultItem {
    /// Result title.
    #[serde(default)]
    pub title: String,
    /// Candidate URL.
    pub link: String,
    /// Provider snippet.
    #[serde(default)]
    pub snippet: String,
}

impl RawResultItem {
    /// Creates a new raw result.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
        }
    }
}

/// A candidate confirmed to be a retrievable PDF.
///
/// This is the unit streamed to subscribers and persisted in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedResult {
    /// Result title.
    pub title: String,
    /// PDF URL.
    pub link: String,
    /// Human-readable size, or [`UNKNOWN_SIZE`].
    pub size: String,
    /// Provider snippet.
    pub snippet: String,
}

impl ValidatedResult {
    /// Builds a validated result from a raw candidate and its size descriptor.
    #[must_use]
    pub fn from_raw(item: RawResultItem, size: impl Into<String>) -> Self {
        Self {
            title: item.title,
            link: item.link,
            size: size.into(),
            snippet: item.snippet,
        }
    }

    /// Whether the size could be determined.
    #[must_use]
    pub fn has_known_size(&self) -> bool {
        self.size != UNKNOWN_SIZE
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 MB");
        assert_eq!(format_size(1_048_576), "1.00 MB");
        assert_eq!(format_size(1_572_864), "1.50 MB");
        assert_eq!(format_size(123_456), "0.12 MB");
    }

    #[test]
    fn test_from_raw() {
        let raw = RawResultItem::new("Paper", "https://example.com/a.pdf", "About it");
        let result = ValidatedResult::from_raw(raw, UNKNOWN_SIZE);

        assert_eq!(result.title, "Paper");
        assert_eq!(result.link, "https://example.com/a.pdf");
        assert!(!result.has_known_size());
    }

    #[test]
    fn test_raw_item_defaults_missing_fields() {
        let item: RawResultItem =
            serde_json::from_str(r#"{"link": "https://example.com/x.pdf"}"#).unwrap();
        assert_eq!(item.title, "");
        assert_eq!(item.snippet, "");
    }

    #[test]
    fn test_validated_result_wire_fields() {
        let result = ValidatedResult {
            title: "T".to_string(),
            link: "https://example.com/t.pdf".to_string(),
            size: "2.00 MB".to_string(),
            snippet: "S".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["size"], "2.00 MB");
        assert_eq!(json.as_object().map(serde_json::Map::len), Some(4));
    }
}
