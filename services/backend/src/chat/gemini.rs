//! Gemini `generateContent` client

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::relay::CompletionClient;

/// Gemini configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; a missing key is reported when a message is relayed
    pub api_key: Option<String>,
    /// Base URL up to and including the API version
    pub api_base: String,
    /// Model name
    pub model: String,
    /// Upper bound on a single upstream call, in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new GeminiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `GEMINI_API_KEY`: API key for the generative-language API
    /// - `GEMINI_API_BASE`: Base URL (default: "https://generativelanguage.googleapis.com/v1beta")
    /// - `GEMINI_MODEL`: Model name (default: "gemini-1.5-pro")
    /// - `GEMINI_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let api_base = std::env::var("GEMINI_API_BASE")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-pro".to_string());
        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        GeminiConfig {
            api_key,
            api_base,
            model,
            timeout_secs,
        }
    }
}

/// Upstream failures, each rendering as the most specific detail available
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// `error.message` from the upstream body
    #[error("{0}")]
    Api(String),

    #[error("Request failed with status code {0}")]
    Status(u16),

    /// Timeout, connection or decoding failure, with its cause chain
    #[error("{0}")]
    Transport(String),
}

/// Join an error with its sources, skipping repeated messages
fn describe_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn single_turn(text: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text }],
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First candidate's first text part, if non-empty
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pick the upstream's own error message when the body carries one
fn error_from_body(status: u16, body: &str) -> GeminiError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => GeminiError::Api(parsed.error.message),
        _ => GeminiError::Status(status),
    }
}

/// HTTP client for the Gemini API
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn transport_error(&self, err: reqwest::Error) -> GeminiError {
        // The request URL carries the API key.
        let err = err.without_url();
        if err.is_timeout() {
            return GeminiError::Transport(format!(
                "timeout of {}ms exceeded",
                self.config.timeout_secs * 1000
            ));
        }
        GeminiError::Transport(describe_chain(&err))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GeminiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GeminiError::MissingApiKey)?;

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&GenerateContentRequest::single_turn(prompt))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(body.first_text())
    }
}
