// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};

use crate::{Result, SummaryError};

/// Upper bound on [`StructuredSummary::keywords`].
pub const MAX_KEYWORDS: usize = 8;

/// Number of keywords joined into a title when the payload has none.
const TITLE_KEYWORDS: usize = 4;

/// The structured payload expected from a hosted summarizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSummary {
    /// Short headline.
    pub title: String,
    /// A few sentences of free text.
    pub summary: String,
    /// Short bullet points.
    pub bullet_points: Vec<String>,
    /// At most [`MAX_KEYWORDS`] key phrases.
    pub keywords: Vec<String>,
}

impl StructuredSummary {
    /// Parses and validates a payload.
    ///
    /// All four fields must be present with the right types, and the keyword
    /// list must not exceed [`MAX_KEYWORDS`] entries.
    pub fn parse(content: &str) -> Result<Self> {
        let parsed: Self = serde_json::from_str(content)?;
        if parsed.keywords.len() > MAX_KEYWORDS {
            return Err(SummaryError::MalformedPayload {
                message: format!(
                    "{} keywords, at most {MAX_KEYWORDS} allowed",
                    parsed.keywords.len()
                ),
            });
        }
        Ok(parsed)
    }

    /// Serializes the payload as the compact JSON string stored on clusters.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Derives a display title from a cluster summary.
///
/// A JSON summary yields its trimmed `title`, or failing that its first four
/// string keywords joined with `・`. Plain-text summaries (such as the local
/// fallback) have no title.
///
/// ```rust
/// use kozaneba_summary::cluster_title;
///
/// assert_eq!(cluster_title(r#"{"title": " Parks "}"#).as_deref(), Some("Parks"));
/// assert_eq!(
///     cluster_title(r#"{"keywords": ["a", "b", 3, "c", "d", "e"]}"#).as_deref(),
///     Some("a・b・c・d")
/// );
/// assert_eq!(cluster_title("Summary: ..."), None);
/// ```
#[must_use]
pub fn cluster_title(summary: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(summary).ok()?;
    if let Some(title) = value.get("title").and_then(|t| t.as_str())
        && !title.trim().is_empty()
    {
        return Some(title.trim().to_owned());
    }
    let keywords: Vec<&str> = value
        .get("keywords")?
        .as_array()?
        .iter()
        .filter_map(|k| k.as_str())
        .take(TITLE_KEYWORDS)
        .collect();
    (!keywords.is_empty()).then(|| keywords.join("・"))
}
