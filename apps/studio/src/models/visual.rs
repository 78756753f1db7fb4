use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::theme::{self, DEFAULT_FONT_FAMILY, DEFAULT_PALETTE, DEFAULT_TEMPLATE};

/// Visual identity applied to the preview.
///
/// Owned by the sync controller and replaced wholesale; one snapshot is used
/// for a whole render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualConfig {
    #[serde(rename = "model")]
    pub template_id: String,
    #[serde(rename = "palette")]
    pub palette_key: String,
    #[serde(rename = "font")]
    pub font_family: String,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            template_id: DEFAULT_TEMPLATE.to_string(),
            palette_key: DEFAULT_PALETTE.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

/// Partial visual config. Missing fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisualConfigPatch {
    pub model: Option<String>,
    pub palette: Option<String>,
    /// Font id (`"roboto"`) or CSS family (`"'Roboto', sans-serif"`).
    pub font: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VisualConfigError {
    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("Unknown palette '{0}'")]
    UnknownPalette(String),

    #[error("Unknown font '{0}'")]
    UnknownFont(String),
}

impl VisualConfig {
    /// True when switching from `self` to `next` requires loading a new template.
    pub fn needs_reload(&self, next: &VisualConfig) -> bool {
        self.template_id != next.template_id
    }

    /// Returns `self` with the fields present in `patch` replaced. Every value
    /// must name a registry entry; nothing is applied if one does not.
    pub fn patched(&self, patch: &VisualConfigPatch) -> Result<VisualConfig, VisualConfigError> {
        let mut config = self.clone();
        if let Some(model) = &patch.model {
            let template = theme::template(model)
                .ok_or_else(|| VisualConfigError::UnknownTemplate(model.clone()))?;
            config.template_id = template.id.to_string();
        }
        if let Some(palette) = &patch.palette {
            let palette = theme::palette(palette)
                .ok_or_else(|| VisualConfigError::UnknownPalette(palette.clone()))?;
            config.palette_key = palette.key.to_string();
        }
        if let Some(font) = &patch.font {
            let choice = theme::font(font)
                .or_else(|| theme::font_by_family(font))
                .ok_or_else(|| VisualConfigError::UnknownFont(font.clone()))?;
            config.font_family = choice.css_family.to_string();
        }
        Ok(config)
    }
}
