//! The rendering-surface contract and its in-memory implementation.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface for template '{0}' has been torn down")]
    Detached(String),
}

/// CSS `display` values the projection engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    None,
    Block,
    InlineBlock,
}

/// A document addressable by element id, with a styleable root.
///
/// Writes to ids the template does not define are silently ignored, matching
/// how templates opt in to fields by exposing the element or not.
pub trait Surface {
    fn set_root_variable(&mut self, name: &str, value: &str) -> Result<(), SurfaceError>;
    fn set_font_family(&mut self, family: &str) -> Result<(), SurfaceError>;
    fn has_element(&self, id: &str) -> bool;
    fn set_text(&mut self, id: &str, text: &str) -> Result<(), SurfaceError>;
    fn set_display(&mut self, id: &str, display: Display) -> Result<(), SurfaceError>;
    /// Replaces the element's children with `markup`.
    fn set_inner_html(&mut self, id: &str, markup: &str) -> Result<(), SurfaceError>;
    fn request_print(&mut self, title: &str) -> Result<(), SurfaceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PreviewSurface
// ────────────────────────────────────────────────────────────────────────────

static ELEMENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bid\s*=\s*["']([^"']+)["']"#).expect("static regex"));

/// Mutable state of one addressable element. `None` means "as authored in
/// the template".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElementState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
}

/// In-memory surface built from a template's markup.
///
/// The snapshot serializes to JSON; the editor client applies it to its own
/// copy of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSurface {
    pub template_id: String,
    pub root_variables: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    pub elements: BTreeMap<String, ElementState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_title: Option<String>,
    /// Incremented on every print request so clients can tell requests apart.
    pub print_requests: u64,
    #[serde(skip)]
    attached: bool,
}

impl PreviewSurface {
    /// Builds a surface exposing every `id="..."` found in `source`.
    pub fn from_template(template_id: &str, source: &str) -> Self {
        let elements = ELEMENT_ID
            .captures_iter(source)
            .map(|c| (c[1].to_string(), ElementState::default()))
            .collect();

        Self {
            template_id: template_id.to_string(),
            root_variables: BTreeMap::new(),
            font_family: None,
            elements,
            print_title: None,
            print_requests: 0,
            attached: true,
        }
    }

    pub fn element(&self, id: &str) -> Option<&ElementState> {
        self.elements.get(id)
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Tears the surface down; every later write fails with `Detached`.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    fn ensure_attached(&self) -> Result<(), SurfaceError> {
        if self.attached {
            Ok(())
        } else {
            Err(SurfaceError::Detached(self.template_id.clone()))
        }
    }

    fn with_element(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut ElementState),
    ) -> Result<(), SurfaceError> {
        self.ensure_attached()?;
        if let Some(element) = self.elements.get_mut(id) {
            f(element);
        }
        Ok(())
    }
}

impl Surface for PreviewSurface {
    fn set_root_variable(&mut self, name: &str, value: &str) -> Result<(), SurfaceError> {
        self.ensure_attached()?;
        self.root_variables
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_font_family(&mut self, family: &str) -> Result<(), SurfaceError> {
        self.ensure_attached()?;
        self.font_family = Some(family.to_string());
        Ok(())
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), SurfaceError> {
        self.with_element(id, |el| el.text = Some(text.to_string()))
    }

    fn set_display(&mut self, id: &str, display: Display) -> Result<(), SurfaceError> {
        self.with_element(id, |el| el.display = Some(display))
    }

    fn set_inner_html(&mut self, id: &str, markup: &str) -> Result<(), SurfaceError> {
        self.with_element(id, |el| el.inner_html = Some(markup.to_string()))
    }

    fn request_print(&mut self, title: &str) -> Result<(), SurfaceError> {
        self.ensure_attached()?;
        self.print_title = Some(title.to_string());
        self.print_requests += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"
        <html><body>
          <h1 id="nome">Nome</h1>
          <span id='cargo'></span>
          <section ID="section-experiencia"><div id="experiencias"></div></section>
        </body></html>
    "#;

    #[test]
    fn test_discovers_element_ids() {
        let surface = PreviewSurface::from_template("model1.html", TEMPLATE);
        let ids: Vec<_> = surface.elements.keys().cloned().collect();
        assert_eq!(ids, ["cargo", "experiencias", "nome", "section-experiencia"]);
    }

    #[test]
    fn test_writes_to_unknown_ids_are_ignored() {
        let mut surface = PreviewSurface::from_template("model1.html", TEMPLATE);
        surface.set_text("linkedin", "in/ana").unwrap();
        assert!(surface.element("linkedin").is_none());
    }

    #[test]
    fn test_detached_surface_rejects_writes() {
        let mut surface = PreviewSurface::from_template("model1.html", TEMPLATE);
        surface.detach();
        assert_eq!(
            surface.set_text("nome", "Ana"),
            Err(SurfaceError::Detached("model1.html".to_string()))
        );
        assert!(surface.set_root_variable("--primary-dark", "#000").is_err());
    }

    #[test]
    fn test_print_requests_are_counted() {
        let mut surface = PreviewSurface::from_template("model1.html", TEMPLATE);
        surface.request_print("CV_Ana").unwrap();
        surface.request_print("CV_Ana").unwrap();
        assert_eq!(surface.print_requests, 2);
        assert_eq!(surface.print_title.as_deref(), Some("CV_Ana"));
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut surface = PreviewSurface::from_template("model1.html", TEMPLATE);
        surface.set_display("nome", Display::InlineBlock).unwrap();
        let json = serde_json::to_value(&surface).unwrap();
        assert_eq!(json["elements"]["nome"]["display"], "inline-block");
        assert!(json.get("attached").is_none());
    }
}
