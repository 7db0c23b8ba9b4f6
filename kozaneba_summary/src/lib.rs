// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kozaneba Summary: short summaries for clusters of notes.
//!
//! A [`SummaryProvider`] turns the texts of one cluster into a summary string.
//! It prefers an external [`Summarizer`], normally the hosted
//! [`OpenRouterSummarizer`], and falls back to a deterministic local summary
//! when none is configured or the call fails for any reason. Failures are
//! logged and never reach the caller.
//!
//! - [`local_summary`]: the first three sentences plus the eight most frequent
//!   keywords. Byte-identical for identical input.
//! - [`OpenRouterSummarizer`]: requests a JSON [`StructuredSummary`] with a
//!   title, a short summary, bullet points and at most eight keywords.
//! - [`cluster_title`]: derives an overlay title from a stored summary.
//! - [`SummaryDispatcher`]: runs summaries on worker threads so a frame loop
//!   can keep drawing while they complete, in any order.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kozaneba_summary::{SummaryDispatcher, SummaryProvider};
//!
//! let provider = Arc::new(SummaryProvider::local());
//! let mut dispatcher = SummaryDispatcher::new(provider, 2);
//! dispatcher.submit("C1", 1, vec!["More trees. Fewer cars.".to_string()]);
//!
//! let done = dispatcher.wait_all();
//! assert_eq!(done[0].key, "C1");
//! assert!(done[0].summary.starts_with("Summary: More trees。Fewer cars"));
//! ```

mod dispatch;
mod error;
mod local;
mod openrouter;
mod provider;
mod structured;

pub use dispatch::{SummaryDispatcher, SummaryDone};
pub use error::{Result, SummaryError};
pub use local::{
    EXCERPT_SENTENCES, KEYWORD_COUNT, STOP_WORDS, excerpt, local_summary, top_keywords,
};
pub use openrouter::{
    DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MAX_INPUT_CHARS, DEFAULT_MODEL,
    OpenRouterConfig, OpenRouterSummarizer, corpus, parse_response,
};
pub use provider::{Summarizer, SummaryProvider};
pub use structured::{MAX_KEYWORDS, StructuredSummary, cluster_title};
