use axum::Json;

use crate::theme::{FontChoice, Palette, TemplateChoice, FONTS, PALETTES, TEMPLATES};

/// GET /api/v1/theme/palettes
pub async fn handle_list_palettes() -> Json<&'static [Palette]> {
    Json(PALETTES)
}

/// GET /api/v1/theme/fonts
pub async fn handle_list_fonts() -> Json<&'static [FontChoice]> {
    Json(FONTS)
}

/// GET /api/v1/theme/templates
pub async fn handle_list_templates() -> Json<&'static [TemplateChoice]> {
    Json(TEMPLATES)
}
