use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::theme;

/// Supplies template markup by template id.
///
/// Loading is the only way a new rendering surface comes into existence; the
/// controller treats a finished load as the surface's readiness signal.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn load(&self, template_id: &str) -> Result<String>;
}

/// Reads templates from a directory on disk.
pub struct DirTemplateSource {
    root: PathBuf,
}

impl DirTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateSource for DirTemplateSource {
    async fn load(&self, template_id: &str) -> Result<String> {
        // Only registered ids are read, so a template id can never walk out of `root`.
        if theme::template(template_id).is_none() {
            bail!("unknown template '{template_id}'");
        }

        let path = self.root.join(template_id);
        debug!("Loading template from {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read template {}", path.display()))
    }
}
