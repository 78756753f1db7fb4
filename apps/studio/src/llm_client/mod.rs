//! LLM Client: the single point of entry for generative model calls in cv-studio.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All generation requests go through a `GenerationBackend`.
//!
//! One call targets one model. Choosing models, retrying and timing calls out
//! belong to `rewrite`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Candidate models, newest first.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key rejected (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("API error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Maps a non-success HTTP status to the failure class the retry engine acts on.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 401 | 403 => LlmError::Auth { status, message },
            404 => LlmError::ModelNotFound(message),
            429 => LlmError::RateLimited(message),
            _ => LlmError::Server { status, message },
        }
    }

    /// Fatal errors abort the whole candidate sweep.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LlmError::Auth { .. })
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(e.to_string())
        }
    }
}

/// A text-in, text-out model endpoint.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, api_key: &str, model: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Gemini `generateContent` over HTTPS.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    base_url: String,
}

impl GeminiBackend {
    pub fn new() -> Result<Self, LlmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, api_key: &str, model: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body, status);
            warn!("Gemini API returned {} for {model}: {message}", status.as_u16());
            return Err(LlmError::from_status(status.as_u16(), message));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;
        debug!("Gemini call to {model} returned {} chars", text.len());
        Ok(text.to_string())
    }
}

/// Reads `error.message` from an error body, falling back to the status reason.
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}

/// Removes every ```json / ``` fence marker from LLM output.
pub fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
