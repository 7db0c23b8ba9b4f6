// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Result alias for summarizer calls.
pub type Result<T> = std::result::Result<T, SummaryError>;

/// Why a summarizer could not produce a summary.
///
/// These never reach callers of [`SummaryProvider`](crate::SummaryProvider),
/// which logs them and falls back to the local summary.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// Required settings, such as the API key, are missing.
    #[error("summarizer is not configured: {reason}")]
    NotConfigured {
        /// What is missing.
        reason: String,
    },

    /// The HTTP request could not be completed (including timeouts).
    #[error("summary request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The service answered with a non-success status.
    #[error("summary service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The response carried no message content.
    #[error("summary service returned an empty response")]
    EmptyResponse,

    /// The content was not the expected JSON object.
    #[error("summary payload is malformed: {message}")]
    MalformedPayload {
        /// Parser or validation message.
        message: String,
    },
}

impl From<serde_json::Error> for SummaryError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload {
            message: err.to_string(),
        }
    }
}
