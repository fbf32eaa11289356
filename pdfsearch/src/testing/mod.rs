//! Testing utilities for the search pipeline.
//!
//! This module provides:
//! - Scripted fakes for the provider, the probe and the cache store
//! - Result fixtures

mod fixtures;
mod mocks;

pub use fixtures::{pdf_item, sample_result};
pub use mocks::{FailingCacheStore, ScriptedPageFetcher, StaticLinkProbe};
