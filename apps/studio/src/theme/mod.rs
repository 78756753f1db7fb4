//! Static registry of palettes, fonts and templates.
//!
//! Read-only at runtime. The projection engine resolves palettes here; the
//! editor reads the same tables through `theme::handlers` to build its pickers.

use serde::Serialize;

pub mod handlers;

pub const DEFAULT_PALETTE: &str = "graphite";
pub const DEFAULT_TEMPLATE: &str = "model1.html";
pub const DEFAULT_FONT_FAMILY: &str = "'Inter', sans-serif";

/// CSS custom property holding the palette's primary color.
pub const PRIMARY_VAR: &str = "--primary-dark";
/// CSS custom property holding the palette's accent color.
pub const ACCENT_VAR: &str = "--accent-steel";

// ────────────────────────────────────────────────────────────────────────────
// Palettes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub key: &'static str,
    pub primary_color: &'static str,
    pub accent_color: &'static str,
    pub display_name: &'static str,
}

pub const PALETTES: &[Palette] = &[
    Palette {
        key: "graphite",
        primary_color: "#252523",
        accent_color: "#4a5568",
        display_name: "Graphite",
    },
    Palette {
        key: "azul",
        primary_color: "#1a365d",
        accent_color: "#2b6cb0",
        display_name: "Azul",
    },
    Palette {
        key: "roxo",
        primary_color: "#44337a",
        accent_color: "#6b46c1",
        display_name: "Roxo",
    },
    Palette {
        key: "rosa",
        primary_color: "#702459",
        accent_color: "#b83280",
        display_name: "Rosa",
    },
    Palette {
        key: "verde",
        primary_color: "#22543d",
        accent_color: "#38a169",
        display_name: "Verde",
    },
    Palette {
        key: "marrom",
        primary_color: "#5e3a1e",
        accent_color: "#8b4513",
        display_name: "Marrom",
    },
];

pub fn palette(key: &str) -> Option<&'static Palette> {
    PALETTES.iter().find(|p| p.key == key)
}

/// Resolves `key`, falling back to the default palette for unknown keys.
pub fn palette_or_default(key: &str) -> &'static Palette {
    palette(key).unwrap_or(&PALETTES[0])
}

// ────────────────────────────────────────────────────────────────────────────
// Fonts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontChoice {
    pub id: &'static str,
    pub display_name: &'static str,
    pub css_family: &'static str,
}

pub const FONTS: &[FontChoice] = &[
    FontChoice {
        id: "inter",
        display_name: "Inter (Ideal para Tech)",
        css_family: "'Inter', sans-serif",
    },
    FontChoice {
        id: "roboto",
        display_name: "Roboto (Moderno)",
        css_family: "'Roboto', sans-serif",
    },
    FontChoice {
        id: "montserrat",
        display_name: "Montserrat (Destaque)",
        css_family: "'Montserrat', sans-serif",
    },
    FontChoice {
        id: "georgia",
        display_name: "Georgia (Executivo/Sério)",
        css_family: "'Georgia', serif",
    },
    FontChoice {
        id: "playfair",
        display_name: "Playfair (Elegante)",
        css_family: "'Playfair Display', serif",
    },
];

pub fn font(id: &str) -> Option<&'static FontChoice> {
    FONTS.iter().find(|f| f.id == id)
}

pub fn font_by_family(css_family: &str) -> Option<&'static FontChoice> {
    FONTS.iter().find(|f| f.css_family == css_family)
}

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

/// A preview template. The markup itself lives on disk under the templates
/// directory; only its identifier is known here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateChoice {
    pub id: &'static str,
    pub display_name: &'static str,
}

pub const TEMPLATES: &[TemplateChoice] = &[
    TemplateChoice {
        id: "model1.html",
        display_name: "Modelo 1: Modern Slate",
    },
    TemplateChoice {
        id: "model2.html",
        display_name: "Modelo 2: Minimalist",
    },
    TemplateChoice {
        id: "model3.html",
        display_name: "Modelo 3: Executive",
    },
    TemplateChoice {
        id: "model4.html",
        display_name: "Modelo 4: Grid Tech",
    },
];

pub fn template(id: &str) -> Option<&'static TemplateChoice> {
    TEMPLATES.iter().find(|t| t.id == id)
}
