use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::export::{attachment_disposition, export_filename, BASE_SCHEMA_FILENAME};
use crate::models::{ResumeDocument, VisualConfig, VisualConfigPatch};
use crate::normalize::{classify, to_pretty_json, NormalizeOutcome};
use crate::projection::PreviewSurface;
use crate::state::AppState;
use crate::storage::DEFAULT_DOCUMENT;
use crate::sync::SyncStatus;

#[derive(Serialize)]
pub struct DocumentResponse {
    pub raw: String,
    /// Last document that normalized successfully.
    pub document: Option<ResumeDocument>,
    pub validation_error: Option<String>,
    pub revision: u64,
}

#[derive(Deserialize)]
pub struct DocumentUpdate {
    pub raw: String,
}

#[derive(Serialize)]
pub struct PrintResponse {
    pub title: String,
}

/// GET /api/v1/document
pub async fn handle_get_document(State(state): State<AppState>) -> Json<DocumentResponse> {
    let status = state.sync.status();
    Json(DocumentResponse {
        raw: status.raw_input,
        document: status.document.as_deref().cloned(),
        validation_error: status.validation_error,
        revision: status.revision,
    })
}

/// PUT /api/v1/document
/// Accepts any text; parsing happens on the controller after the debounce window.
pub async fn handle_put_document(
    State(state): State<AppState>,
    Json(req): Json<DocumentUpdate>,
) -> Result<(StatusCode, Json<SyncStatus>), AppError> {
    state.sync.submit_edit(req.raw).await?;
    Ok((StatusCode::ACCEPTED, Json(state.sync.status())))
}

/// GET /api/v1/visual-config
pub async fn handle_get_visual_config(State(state): State<AppState>) -> Json<VisualConfig> {
    Json(state.sync.status().visual_config)
}

/// PUT /api/v1/visual-config
/// Missing fields keep their current value; the merge runs on the controller.
pub async fn handle_put_visual_config(
    State(state): State<AppState>,
    Json(patch): Json<VisualConfigPatch>,
) -> Result<Json<VisualConfig>, AppError> {
    let config = state.sync.update_visual_config(patch).await?;
    Ok(Json(config))
}

/// GET /api/v1/sync/status
pub async fn handle_sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.sync.status())
}

/// GET /api/v1/preview
pub async fn handle_get_preview(
    State(state): State<AppState>,
) -> Result<Json<PreviewSurface>, AppError> {
    state
        .sync
        .preview()
        .map(Json)
        .ok_or_else(|| AppError::Conflict("Preview is still loading".to_string()))
}

/// POST /api/v1/import
/// Body is the file's text. The document is re-indented before it reaches the editor.
pub async fn handle_import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ResumeDocument>, AppError> {
    match classify(&body) {
        NormalizeOutcome::Empty => Err(AppError::Validation("Imported file is empty".to_string())),
        NormalizeOutcome::Invalid(reason) => Err(AppError::UnprocessableEntity(format!(
            "Imported file is not a valid résumé: {reason}"
        ))),
        NormalizeOutcome::Valid(doc) => {
            state.sync.submit_edit(to_pretty_json(&doc)).await?;
            Ok(Json(doc))
        }
    }
}

/// GET /api/v1/export
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let status = state.sync.status();
    let document = status
        .document
        .ok_or_else(|| AppError::NotFound("No valid document to export".to_string()))?;

    let filename = export_filename(&Local::now());
    Ok(json_download(&filename, to_pretty_json(&document)))
}

/// GET /api/v1/export/template
pub async fn handle_export_template() -> Response {
    json_download(BASE_SCHEMA_FILENAME, DEFAULT_DOCUMENT.to_string())
}

/// POST /api/v1/print
pub async fn handle_print(State(state): State<AppState>) -> Result<Json<PrintResponse>, AppError> {
    let title = state
        .sync
        .request_print()
        .await?
        .ok_or_else(|| AppError::Conflict("Preview is not ready to print".to_string()))?;
    Ok(Json(PrintResponse { title }))
}

fn json_download(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(filename)),
        ],
        body,
    )
        .into_response()
}
