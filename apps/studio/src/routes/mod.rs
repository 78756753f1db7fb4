pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::rewrite::handlers as rewrite;
use crate::state::AppState;
use crate::sync::handlers as sync;
use crate::theme::handlers as theme;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Editor document + preview
        .route(
            "/api/v1/document",
            get(sync::handle_get_document).put(sync::handle_put_document),
        )
        .route(
            "/api/v1/visual-config",
            get(sync::handle_get_visual_config).put(sync::handle_put_visual_config),
        )
        .route("/api/v1/sync/status", get(sync::handle_sync_status))
        .route("/api/v1/preview", get(sync::handle_get_preview))
        .route("/api/v1/print", post(sync::handle_print))
        // Files
        .route("/api/v1/import", post(sync::handle_import))
        .route("/api/v1/export", get(sync::handle_export))
        .route("/api/v1/export/template", get(sync::handle_export_template))
        // Theme registry
        .route("/api/v1/theme/palettes", get(theme::handle_list_palettes))
        .route("/api/v1/theme/fonts", get(theme::handle_list_fonts))
        .route("/api/v1/theme/templates", get(theme::handle_list_templates))
        // AI rewrite
        .route("/api/v1/rewrite", post(rewrite::handle_rewrite))
        .with_state(state)
}
