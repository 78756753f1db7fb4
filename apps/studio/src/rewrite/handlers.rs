use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::normalize::{classify, to_pretty_json, NormalizeOutcome};
use crate::rewrite::{JobDescription, RewriteError};
use crate::state::AppState;
use crate::storage::API_KEY_KEY;

#[derive(Deserialize)]
pub struct RewriteRequest {
    /// Overrides the stored key; remembered once a rewrite succeeds with it.
    pub api_key: Option<String>,
    pub job_description: JobDescription,
}

#[derive(Serialize)]
pub struct RewriteResponse {
    pub document: ResumeDocument,
}

/// POST /api/v1/rewrite
/// Rewrites the current document for a job, then hands the result to the editor.
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Json(req): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, AppError> {
    let supplied = req.api_key.filter(|k| !k.trim().is_empty());
    let api_key = supplied
        .clone()
        .or_else(|| state.store.get(API_KEY_KEY).ok().flatten())
        .or_else(|| state.config.gemini_api_key.clone())
        .ok_or(RewriteError::InvalidApiKey)?;

    let current = state.sync.status().document.ok_or_else(|| {
        AppError::Validation("The current document is not valid JSON".to_string())
    })?;

    let value = state
        .rewrite
        .rewrite(&api_key, &current, &req.job_description)
        .await?;

    let raw = serde_json::to_string_pretty(&value)
        .map_err(|e| RewriteError::Integrity(e.to_string()))?;
    let document = match classify(&raw) {
        NormalizeOutcome::Valid(doc) => doc,
        NormalizeOutcome::Empty | NormalizeOutcome::Invalid(_) => {
            return Err(RewriteError::Integrity("rewritten document did not validate".to_string()).into())
        }
    };

    state.sync.submit_edit(to_pretty_json(&document)).await?;
    if let Some(key) = supplied {
        state.store.set_logged(API_KEY_KEY, key.trim());
    }
    info!(
        "Rewrite applied: {} experience entries",
        document.experience.len()
    );

    Ok(Json(RewriteResponse { document }))
}
