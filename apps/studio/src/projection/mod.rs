//! Projection engine: applies `(document, visual config)` onto a rendering surface.
//!
//! Every write to a surface goes through [`project`]. Calling it twice with the
//! same inputs leaves the surface in the same state as calling it once: scalar
//! fields are overwritten, visibility is set explicitly both ways, and list
//! containers are regenerated from scratch.

use tracing::warn;

use crate::models::{ResumeDocument, VisualConfig};
use crate::theme::{palette_or_default, ACCENT_VAR, PRIMARY_VAR};

pub mod markup;
pub mod surface;

pub use surface::{Display, ElementState, PreviewSurface, Surface, SurfaceError};

use markup::{render_course_items, render_hard_skills, render_pills, render_timeline, TimelineRow};

/// Element ids the templates may expose.
pub mod ids {
    pub const NAME: &str = "nome";
    pub const ROLE: &str = "cargo";
    pub const SUMMARY: &str = "resumo";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "tel";
    pub const LOCATION: &str = "local";
    pub const LINKEDIN: &str = "linkedin";
    pub const BIRTH_DATE: &str = "nascimento";

    pub const SECTION_SUMMARY: &str = "section-resumo";
    pub const SECTION_CONTACT: &str = "section-contato";
    pub const SECTION_EXPERIENCE: &str = "section-experiencia";
    pub const SECTION_EDUCATION: &str = "section-formacao";
    pub const SECTION_HARD_SKILLS: &str = "section-hard-skills";
    pub const SECTION_SOFT_SKILLS: &str = "section-soft-skills";
    pub const SECTION_COURSES: &str = "section-cursos";

    pub const EXPERIENCE_LIST: &str = "experiencias";
    pub const EDUCATION_LIST: &str = "formacao";
    pub const HARD_SKILLS_LIST: &str = "hard-skills-lista";
    pub const SOFT_SKILLS_LIST: &str = "soft-skills-lista";
    pub const COURSES_LIST: &str = "cursos-lista";
}

/// Projects `data` and `config` onto `surface`.
///
/// The palette and font are applied even when `data` is `None`; structure is
/// left untouched in that case so a transient parse error does not blank the
/// preview. Surface failures are logged, never propagated.
pub fn project(surface: &mut dyn Surface, data: Option<&ResumeDocument>, config: &VisualConfig) {
    if let Err(e) = try_project(surface, data, config) {
        warn!("Projection aborted: {e}");
    }
}

fn try_project(
    surface: &mut dyn Surface,
    data: Option<&ResumeDocument>,
    config: &VisualConfig,
) -> Result<(), SurfaceError> {
    apply_identity(surface, config)?;

    let Some(doc) = data else {
        return Ok(());
    };

    apply_scalars(surface, doc)?;
    apply_section_visibility(surface, doc)?;
    apply_lists(surface, doc)
}

fn apply_identity(surface: &mut dyn Surface, config: &VisualConfig) -> Result<(), SurfaceError> {
    let palette = palette_or_default(&config.palette_key);
    surface.set_root_variable(PRIMARY_VAR, palette.primary_color)?;
    surface.set_root_variable(ACCENT_VAR, palette.accent_color)?;
    surface.set_font_family(&config.font_family)
}

fn apply_scalars(surface: &mut dyn Surface, doc: &ResumeDocument) -> Result<(), SurfaceError> {
    let contact = &doc.contact;
    let fields = [
        (ids::NAME, doc.name.as_deref()),
        (ids::ROLE, doc.role.as_deref()),
        (ids::SUMMARY, doc.summary.as_deref()),
        (ids::EMAIL, contact.email.as_deref()),
        (ids::PHONE, contact.phone.as_deref()),
        (ids::LOCATION, contact.location.as_deref()),
        (ids::LINKEDIN, contact.linkedin.as_deref()),
        (ids::BIRTH_DATE, contact.birth_date.as_deref()),
    ];

    for (id, value) in fields {
        if !surface.has_element(id) {
            continue;
        }
        match value.filter(|v| !v.trim().is_empty()) {
            Some(text) => {
                surface.set_text(id, text)?;
                surface.set_display(id, Display::InlineBlock)?;
            }
            None => surface.set_display(id, Display::None)?,
        }
    }
    Ok(())
}

fn apply_section_visibility(
    surface: &mut dyn Surface,
    doc: &ResumeDocument,
) -> Result<(), SurfaceError> {
    let sections = [
        (ids::SECTION_SUMMARY, doc.summary.is_some()),
        (ids::SECTION_CONTACT, !doc.contact.is_empty()),
        (ids::SECTION_EXPERIENCE, !doc.experience.is_empty()),
        (ids::SECTION_EDUCATION, !doc.education.is_empty()),
        (ids::SECTION_HARD_SKILLS, !doc.hard_skills.is_empty()),
        (ids::SECTION_SOFT_SKILLS, !doc.soft_skills.is_empty()),
        (ids::SECTION_COURSES, !doc.courses.is_empty()),
    ];

    for (id, visible) in sections {
        if surface.has_element(id) {
            let display = if visible { Display::Block } else { Display::None };
            surface.set_display(id, display)?;
        }
    }
    Ok(())
}

fn apply_lists(surface: &mut dyn Surface, doc: &ResumeDocument) -> Result<(), SurfaceError> {
    let lists = [
        (
            ids::EXPERIENCE_LIST,
            render_timeline(doc.experience.iter().map(TimelineRow::from)),
        ),
        (
            ids::EDUCATION_LIST,
            render_timeline(doc.education.iter().map(TimelineRow::from)),
        ),
        (ids::HARD_SKILLS_LIST, render_hard_skills(&doc.hard_skills)),
        (ids::SOFT_SKILLS_LIST, render_pills(&doc.soft_skills)),
        (ids::COURSES_LIST, render_course_items(&doc.courses)),
    ];

    for (id, markup) in lists {
        if surface.has_element(id) {
            surface.set_inner_html(id, &markup)?;
        }
    }
    Ok(())
}
