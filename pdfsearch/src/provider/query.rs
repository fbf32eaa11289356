//! Provider request parameters.

use crate::core::LanguageProfile;

/// Suffix restricting provider results to PDF files.
pub const FILETYPE_RESTRICTION: &str = "filetype:pdf";

/// Parameters of one provider page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    /// Query text including the file-type restriction.
    pub q: String,
    /// Number of results requested.
    pub num: usize,
    /// Offset of the first result.
    pub start: usize,
    /// Language restriction; omitted from the request when empty.
    pub lr: String,
    /// Region.
    pub gl: String,
}

impl ProviderQuery {
    /// Builds the request for page `page_index` of `page_size` results.
    #[must_use]
    pub fn new(
        query: &str,
        profile: &LanguageProfile,
        page_index: usize,
        page_size: usize,
    ) -> Self {
        Self {
            q: format!("{} {FILETYPE_RESTRICTION}", query.trim()),
            num: page_size,
            start: page_index * page_size,
            lr: profile.language.to_string(),
            gl: profile.region.to_string(),
        }
    }

    /// Converts to `(name, value)` query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("q", self.q.clone()),
            ("num", self.num.to_string()),
            ("start", self.start.to_string()),
        ];
        if !self.lr.is_empty() {
            pairs.push(("lr", self.lr.clone()));
        }
        pairs.push(("gl", self.gl.clone()));
        pairs
    }
}
