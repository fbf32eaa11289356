//! The search-validate-cache pipeline.
//!
//! [`PdfSearchService`] drives one request from cache lookup to completion;
//! [`SearchHandler`] is the transport-facing trigger that adds precondition
//! reporting and the terminal-event guarantee.

mod handler;
mod orchestrator;
mod summary;

pub use handler::SearchHandler;
pub use orchestrator::PdfSearchService;
pub use summary::SearchSummary;
