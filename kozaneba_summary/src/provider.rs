// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::{Result, local_summary};

/// Something that turns a cluster's texts into a summary string.
///
/// Implementations may block; they are run off the frame loop by
/// [`SummaryDispatcher`](crate::SummaryDispatcher).
pub trait Summarizer: Send + Sync {
    /// Summarizes the texts of one cluster.
    fn summarize(&self, texts: &[String]) -> Result<String>;
}

/// Prefers an external summarizer and falls back to the local summary.
///
/// [`SummaryProvider::summarize`] is infallible: any error or panic from the
/// external summarizer is logged at `warn` level and replaced by
/// [`local_summary`].
#[derive(Default)]
pub struct SummaryProvider {
    external: Option<Box<dyn Summarizer>>,
}

impl SummaryProvider {
    /// A provider that only uses the local fallback.
    #[must_use]
    pub fn local() -> Self {
        Self { external: None }
    }

    /// A provider that tries `external` first.
    pub fn with_external(external: impl Summarizer + 'static) -> Self {
        Self {
            external: Some(Box::new(external)),
        }
    }

    /// Returns `true` if an external summarizer is configured.
    #[must_use]
    pub fn has_external(&self) -> bool {
        self.external.is_some()
    }

    /// Summarizes `texts`, never failing.
    #[must_use]
    pub fn summarize(&self, texts: &[String]) -> String {
        if let Some(external) = &self.external {
            match panic::catch_unwind(AssertUnwindSafe(|| external.summarize(texts))) {
                Ok(Ok(summary)) => return summary,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "external summary failed, using local fallback");
                }
                Err(payload) => {
                    tracing::warn!(
                        panic = panic_message(payload.as_ref()),
                        "external summarizer panicked, using local fallback"
                    );
                }
            }
        }
        local_summary(texts)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

impl fmt::Debug for SummaryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryProvider")
            .field("external", &self.external.is_some())
            .finish()
    }
}
