//! AI rewrite: tailors the current résumé to a job description through a
//! generative model, without inventing facts.
//!
//! The client sweeps an ordered list of candidate models, falls through on
//! transient failures, and returns the first response that passes the
//! integrity check. The result is raw JSON; callers run it through
//! `normalize` before it reaches the preview.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::{strip_json_fences, LlmError, DEFAULT_MODELS};
use crate::models::ResumeDocument;
use crate::rewrite::prompts::REWRITE_PROMPT_TEMPLATE;

pub mod client;
pub mod handlers;
pub mod prompts;

pub use client::RewriteClient;

/// Minimum number of non-whitespace characters in a job description.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 10;

/// Keys a rewritten document must keep.
pub const REQUIRED_KEYS: &[&str] = &["nome", "experiencias", "contato"];

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("API key is missing or blank")]
    InvalidApiKey,

    #[error("job description is too short (at least {MIN_JOB_DESCRIPTION_CHARS} characters)")]
    JobDescriptionTooShort,

    #[error("API key was rejected by the provider: {0}")]
    Auth(String),

    #[error("AI service is overloaded, try again in a minute: {0}")]
    Overloaded(String),

    #[error("could not reach the AI service: {0}")]
    Connectivity(String),

    #[error("no compatible model is available for this API key")]
    NoCompatibleModel,

    #[error("AI response broke the document structure: {0}")]
    Integrity(String),
}

impl From<LlmError> for RewriteError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Auth { .. } => RewriteError::Auth(e.to_string()),
            LlmError::RateLimited(_) | LlmError::Server { .. } => {
                RewriteError::Overloaded(e.to_string())
            }
            LlmError::Timeout | LlmError::Network(_) => RewriteError::Connectivity(e.to_string()),
            LlmError::ModelNotFound(_) => RewriteError::NoCompatibleModel,
            LlmError::EmptyContent => RewriteError::Integrity(e.to_string()),
        }
    }
}

/// Target job, as free text or as any JSON structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JobDescription {
    Text(String),
    Structured(Value),
}

impl JobDescription {
    /// Text embedded in the prompt. Structured descriptions are pretty-printed.
    pub fn context(&self) -> String {
        match self {
            JobDescription::Text(text) => text.trim().to_string(),
            JobDescription::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }

    pub fn validate(&self) -> Result<String, RewriteError> {
        let context = self.context();
        let meaningful = context.chars().filter(|c| !c.is_whitespace()).count();
        if meaningful < MIN_JOB_DESCRIPTION_CHARS {
            return Err(RewriteError::JobDescriptionTooShort);
        }
        Ok(context)
    }
}

/// How the client walks the candidate models.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Candidate model ids, tried in order.
    pub models: Vec<String>,
    /// Full sweeps over `models`.
    pub passes: u32,
    /// Pause between sweeps.
    pub cooldown: Duration,
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            passes: 2,
            cooldown: Duration::from_secs(2),
            call_timeout: Duration::from_secs(10),
        }
    }
}

pub fn build_prompt(current: &ResumeDocument, job_context: &str) -> Result<String, RewriteError> {
    let resume_json = serde_json::to_string(current)
        .map_err(|e| RewriteError::Integrity(format!("could not serialize résumé: {e}")))?;

    Ok(REWRITE_PROMPT_TEMPLATE
        .replace("{no_fabrication_instruction}", NO_FABRICATION_INSTRUCTION)
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{job_context}", job_context)
        .replace("{resume_json}", &resume_json))
}

/// Pulls the JSON object out of model output and checks its shape.
///
/// Fences are removed, then everything between the first `{` and the last `}`
/// is parsed. The result must be an object carrying every required key.
pub fn extract_document(text: &str) -> Result<Value, RewriteError> {
    let cleaned = strip_json_fences(text);
    let candidate = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned.as_str(),
    };

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| RewriteError::Integrity(format!("response is not valid JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| RewriteError::Integrity("response is not a JSON object".to_string()))?;

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|k| !object.contains_key(*k))
        .collect();
    if !missing.is_empty() {
        return Err(RewriteError::Integrity(format!(
            "missing keys: {}",
            missing.join(", ")
        )));
    }

    Ok(value)
}
