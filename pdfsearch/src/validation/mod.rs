//! Link validation.
//!
//! This module provides:
//! - A [`LinkProbe`] protocol and its `HEAD`-based implementation
//! - The hybrid classification policy in [`classify`]
//! - [`LinkValidator`], combining the two

mod probe;
mod validator;

pub use probe::{HttpLinkProbe, LinkProbe, ProbeFailure, ProbeResponse, ProbeResult};
pub use validator::{classify, looks_like_pdf, Confidence, LinkValidator, ValidationOutcome};
