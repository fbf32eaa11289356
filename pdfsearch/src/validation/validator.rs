//! Hybrid PDF link validation.
//!
//! A server confirmation (`200` + `application/pdf`) is preferred. Many hosts
//! block `HEAD` or send a wrong content type, so a `.pdf` path is accepted as
//! a fallback whenever the probe did not confirm.

use std::sync::Arc;

use reqwest::Url;
use serde::Serialize;
use tracing::debug;

use super::probe::{LinkProbe, ProbeResult};
use crate::core::{format_size, UNKNOWN_SIZE};

/// How a link was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// The server reported `200` with a PDF content type.
    Confirmed,
    /// Accepted on the strength of the `.pdf` extension.
    Heuristic,
}

/// A link accepted as a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    /// The validated URL.
    pub link: String,
    /// Size descriptor: `"<n.nn> MB"` or [`UNKNOWN_SIZE`].
    pub size: String,
    /// How the link was accepted.
    pub confidence: Confidence,
}

impl ValidationOutcome {
    fn confirmed(link: &str, content_length: Option<u64>) -> Self {
        Self {
            link: link.to_string(),
            size: content_length.map_or_else(|| UNKNOWN_SIZE.to_string(), format_size),
            confidence: Confidence::Confirmed,
        }
    }

    fn heuristic(link: &str) -> Self {
        Self {
            link: link.to_string(),
            size: UNKNOWN_SIZE.to_string(),
            confidence: Confidence::Heuristic,
        }
    }
}

/// Whether a URL's path ends in `.pdf` (case-insensitive).
///
/// Unparseable URLs are checked as plain strings.
#[must_use]
pub fn looks_like_pdf(url: &str) -> bool {
    let candidate = Url::parse(url).map_or_else(|_| url.to_string(), |u| u.path().to_string());
    candidate.to_ascii_lowercase().ends_with(".pdf")
}

/// Classifies a probe result for a URL.
///
/// Pure function of its inputs; see the module docs for the policy.
#[must_use]
pub fn classify(url: &str, probe: &ProbeResult) -> Option<ValidationOutcome> {
    match probe {
        Ok(response) if response.status == 200 && response.declares_pdf() => {
            Some(ValidationOutcome::confirmed(url, response.content_length))
        }
        Ok(response) if response.status != 200 && looks_like_pdf(url) => {
            Some(ValidationOutcome::heuristic(url))
        }
        Ok(_) => None,
        Err(_) if looks_like_pdf(url) => Some(ValidationOutcome::heuristic(url)),
        Err(_) => None,
    }
}

/// Validates candidate links against a [`LinkProbe`].
#[derive(Clone)]
pub struct LinkValidator {
    probe: Arc<dyn LinkProbe>,
}

impl LinkValidator {
    /// Creates a validator over a probe.
    #[must_use]
    pub fn new(probe: Arc<dyn LinkProbe>) -> Self {
        Self { probe }
    }

    /// Determines whether `url` is an accessible PDF.
    ///
    /// Never fails: network errors collapse into a heuristic outcome or
    /// `None`.
    pub async fn validate(&self, url: &str) -> Option<ValidationOutcome> {
        let probe = self.probe.probe(url).await;
        let outcome = classify(url, &probe);

        match (&probe, &outcome) {
            (Err(failure), Some(_)) => {
                debug!(url, %failure, "Probe failed, accepted by extension");
            }
            (Err(failure), None) => debug!(url, %failure, "Probe failed, rejected"),
            (Ok(response), Some(o)) => {
                debug!(url, status = response.status, confidence = ?o.confidence, "Accepted");
            }
            (Ok(response), None) => debug!(url, status = response.status, "Rejected"),
        }

        outcome
    }
}

impl std::fmt::Debug for LinkValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkValidator").finish_non_exhaustive()
    }
}
