//! Core domain model types.
//!
//! This module contains the values that flow through the search pipeline:
//! - Raw provider candidates and validated PDF results
//! - Language profiles used to localise provider queries
//! - Search requests and the events streamed to a subscriber

mod event;
mod language;
mod request;
mod result;

pub use event::SearchEvent;
pub use language::{LanguageProfile, DEFAULT_LANGUAGE};
pub use request::SearchRequest;
pub use result::{format_size, RawResultItem, ValidatedResult, UNKNOWN_SIZE};
