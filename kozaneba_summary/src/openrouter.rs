// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hosted summarization through the OpenRouter chat completions API.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, StructuredSummary, Summarizer, SummaryError};

/// Chat completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Corpus budget in characters before the truncation marker.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 12_000;

const SYSTEM_PROMPT: &str = "You are an expert at summarizing collections of short bullet-style notes.";

/// Connection and request settings for [`OpenRouterSummarizer`].
#[derive(Clone)]
pub struct OpenRouterConfig {
    /// Chat completions URL.
    pub endpoint: String,
    /// Model identifier.
    pub model: String,
    /// Completion token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Corpus budget in characters.
    pub max_input_chars: usize,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Bearer token.
    pub api_key: String,
}

impl OpenRouterConfig {
    /// Default settings with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: 600,
            temperature: 0.2,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            timeout: Duration::from_secs(60),
            api_key: api_key.into(),
        }
    }

    /// Default settings with the API key read from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(SummaryError::NotConfigured {
                reason: format!("environment variable {var} is not set"),
            }),
        }
    }
}

impl fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("max_input_chars", &self.max_input_chars)
            .field("timeout", &self.timeout)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Joins texts into a bulleted corpus, truncated to `max_chars` characters.
///
/// Truncated corpora end with `\n…`.
#[must_use]
pub fn corpus(texts: &[String], max_chars: usize) -> String {
    let joined = texts.join("\n- ");
    match joined.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}\n…", &joined[..cut]),
        None => joined,
    }
}

fn user_prompt(corpus: &str) -> String {
    format!(
        "The following sticky notes share one topic. Write a structured summary \
         in the language of the notes and output JSON only, with these keys:\n\
         - title: a short headline of 20 to 40 characters\n\
         - summary: 3 to 5 concise sentences\n\
         - bullet_points: 3 to 6 short points\n\
         - keywords: at most 8 key phrases (array)\n\
         Do not output anything except the JSON object.\n\n\
         Notes:\n- {corpus}"
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts and validates the structured summary from a response body.
///
/// The body must carry a non-empty `choices[0].message.content` that parses
/// as a [`StructuredSummary`].
pub fn parse_response(body: &str) -> Result<StructuredSummary> {
    let response: ChatResponse = serde_json::from_str(body)?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(SummaryError::EmptyResponse)?;
    StructuredSummary::parse(&content)
}

/// [`Summarizer`] that calls the OpenRouter chat completions API.
///
/// Calls block the calling thread for at most the configured timeout; run
/// them through a [`SummaryDispatcher`](crate::SummaryDispatcher) to keep a
/// frame loop responsive.
#[derive(Debug)]
pub struct OpenRouterSummarizer {
    config: OpenRouterConfig,
    agent: ureq::Agent,
}

impl OpenRouterSummarizer {
    /// Creates a summarizer with its own HTTP agent.
    pub fn new(config: OpenRouterConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            config,
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// The JSON request body for `texts`.
    pub fn request_body(&self, texts: &[String]) -> Result<serde_json::Value> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(&corpus(texts, self.config.max_input_chars)),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        Ok(serde_json::to_value(request)?)
    }
}

impl Summarizer for OpenRouterSummarizer {
    fn summarize(&self, texts: &[String]) -> Result<String> {
        let body = self.request_body(texts)?;
        let mut response = self
            .agent
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("X-Title", "kozaneba")
            .send_json(&body)?;
        let status = response.status();
        let text = response.body_mut().read_to_string()?;
        if !status.is_success() {
            return Err(SummaryError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        tracing::trace!(texts = texts.len(), model = %self.config.model, "hosted summary received");
        parse_response(&text)?.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::{OpenRouterConfig, OpenRouterSummarizer, corpus, parse_response};
    use crate::SummaryError;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn corpus_joins_with_bullets() {
        assert_eq!(corpus(&texts(&["a", "b", "c"]), 100), "a\n- b\n- c");
    }

    #[test]
    fn corpus_truncates_by_characters() {
        let t = texts(&["あいうえお"]);
        assert_eq!(corpus(&t, 3), "あいう\n…");
        assert_eq!(corpus(&t, 5), "あいうえお");
    }

    #[test]
    fn request_body_carries_contract_fields() {
        let summarizer = OpenRouterSummarizer::new(OpenRouterConfig::new("key"));
        let body = summarizer
            .request_body(&texts(&["bus stop", "bike lane"]))
            .unwrap();
        assert_eq!(body["model"], "openai/gpt-4o-mini");
        assert_eq!(body["max_tokens"], 600);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.ends_with("Notes:\n- bus stop\n- bike lane"));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let debug = format!("{:?}", OpenRouterConfig::new("secret-key"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn parse_response_extracts_content() {
        let body = r#"{"choices":[{"message":{"content":"{\"title\":\"t\",\"summary\":\"s\",\"bullet_points\":[],\"keywords\":[\"k\"]}"}}]}"#;
        assert_eq!(parse_response(body).unwrap().title, "t");
    }

    #[test]
    fn parse_response_rejects_empty_and_missing_content() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"content":"  "}}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
        ] {
            assert!(matches!(
                parse_response(body),
                Err(SummaryError::EmptyResponse)
            ));
        }
        assert!(matches!(
            parse_response(r#"{"choices":[{"message":{"content":"plain text"}}]}"#),
            Err(SummaryError::MalformedPayload { .. })
        ));
    }
}
