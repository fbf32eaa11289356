//! Language profiles for localised provider queries.

use serde::Serialize;
use std::fmt;

/// Code of the fallback profile.
pub const DEFAULT_LANGUAGE: &str = "all";

/// Maps a language code onto the provider's language (`lr`) and region
/// (`gl`) parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LanguageProfile {
    /// Language code as submitted by clients.
    pub code: &'static str,
    /// Provider region parameter.
    pub region: &'static str,
    /// Provider language restriction; empty means unrestricted.
    pub language: &'static str,
}

const PROFILES: [LanguageProfile; 5] = [
    LanguageProfile {
        code: "all",
        region: "us",
        language: "",
    },
    LanguageProfile {
        code: "pt-BR",
        region: "br",
        language: "lang_pt",
    },
    LanguageProfile {
        code: "pt-PT",
        region: "pt",
        language: "lang_pt",
    },
    LanguageProfile {
        code: "en",
        region: "us",
        language: "lang_en",
    },
    LanguageProfile {
        code: "es",
        region: "es",
        language: "lang_es",
    },
];

impl LanguageProfile {
    /// Resolves a language code, falling back to the `all` profile.
    ///
    /// Matching is exact after trimming, so `pt-BR` and `pt-br` are distinct.
    #[must_use]
    pub fn resolve(code: &str) -> Self {
        Self::lookup(code.trim()).unwrap_or_else(Self::all)
    }

    /// Looks up a profile without falling back.
    #[must_use]
    pub fn lookup(code: &str) -> Option<Self> {
        PROFILES.iter().copied().find(|p| p.code == code)
    }

    /// The unrestricted profile.
    #[must_use]
    pub const fn all() -> Self {
        PROFILES[0]
    }

    /// All known profiles.
    #[must_use]
    pub const fn known() -> &'static [Self] {
        &PROFILES
    }

    /// Whether the profile restricts results by language.
    #[must_use]
    pub fn restricts_language(&self) -> bool {
        !self.language.is_empty()
    }
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
