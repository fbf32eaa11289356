//! Result fixtures.

use crate::core::{RawResultItem, ValidatedResult, UNKNOWN_SIZE};

/// A provider candidate pointing at `https://docs.example/<n>.pdf`.
#[must_use]
pub fn pdf_item(n: usize) -> RawResultItem {
    RawResultItem::new(
        format!("Document {n}"),
        format!("https://docs.example/{n}.pdf"),
        format!("Snippet {n}"),
    )
}

/// The validated form of [`pdf_item`] with an unknown size.
#[must_use]
pub fn sample_result(n: usize) -> ValidatedResult {
    ValidatedResult::from_raw(pdf_item(n), UNKNOWN_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_agree() {
        let result = sample_result(7);
        assert_eq!(result.link, pdf_item(7).link);
        assert_eq!(result.title, "Document 7");
        assert!(!result.has_known_size());
    }
}
