use std::sync::Arc;

use serde_json::Value;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use crate::llm_client::{GenerationBackend, LlmError};
use crate::models::ResumeDocument;
use crate::rewrite::{build_prompt, extract_document, JobDescription, RetryPolicy, RewriteError};

/// Rewrites a résumé through the first candidate model that answers with an
/// intact document.
#[derive(Clone)]
pub struct RewriteClient {
    backend: Arc<dyn GenerationBackend>,
    policy: RetryPolicy,
}

impl RewriteClient {
    pub fn new(backend: Arc<dyn GenerationBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Validates input, then sweeps the candidate models up to `passes` times.
    ///
    /// Auth failures end the sweep at once. Everything else moves on to the
    /// next candidate; the error returned after exhaustion reflects the last
    /// failure seen, or `NoCompatibleModel` when every candidate was missing.
    pub async fn rewrite(
        &self,
        api_key: &str,
        current: &ResumeDocument,
        job: &JobDescription,
    ) -> Result<Value, RewriteError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(RewriteError::InvalidApiKey);
        }
        let job_context = job.validate()?;
        let prompt = build_prompt(current, &job_context)?;

        let mut last_error: Option<RewriteError> = None;

        for pass in 1..=self.policy.passes {
            if pass > 1 {
                warn!(
                    "Rewrite pass {} failed on every model, cooling down {}ms",
                    pass - 1,
                    self.policy.cooldown.as_millis()
                );
                sleep(self.policy.cooldown).await;
            }

            for model in &self.policy.models {
                let text = match self.call(api_key, model, &prompt).await {
                    Ok(text) => text,
                    Err(e) if e.is_fatal() => {
                        warn!("Rewrite aborted, {model} rejected the API key");
                        return Err(e.into());
                    }
                    Err(LlmError::ModelNotFound(_)) => {
                        warn!("{model} is not available (404), skipping");
                        continue;
                    }
                    Err(e) => {
                        warn!("{model} failed: {e}, skipping");
                        last_error = Some(e.into());
                        continue;
                    }
                };

                match extract_document(&text) {
                    Ok(document) => {
                        info!("Rewrite succeeded on pass {pass} with {model}");
                        return Ok(document);
                    }
                    Err(e) => {
                        warn!("{model} answered with a broken document: {e}, skipping");
                        last_error = Some(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or(RewriteError::NoCompatibleModel))
    }

    /// One bounded call to one model.
    async fn call(&self, api_key: &str, model: &str, prompt: &str) -> Result<String, LlmError> {
        timeout(
            self.policy.call_timeout,
            self.backend.generate(api_key, model, prompt),
        )
        .await
        .unwrap_or(Err(LlmError::Timeout))
    }
}
