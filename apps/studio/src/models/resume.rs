use serde::{Deserialize, Serialize};

/// Canonical, normalized résumé.
///
/// Field names are English; the wire keys follow the JSON schema users edit
/// (`nome`, `experiencias`, ...). Every instance handed out by
/// `normalize::normalize` satisfies:
/// - all collections are present (possibly empty),
/// - every `HardSkill::level` is within `0..=100`,
/// - every `status` is upper-case,
/// - every string has been sanitized.
///
/// Documents are replaced wholesale on every successful parse; nothing
/// patches one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "cargo", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "resumo", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "contato", default)]
    pub contact: Contact,
    #[serde(rename = "experiencias", default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(rename = "formacao", default)]
    pub education: Vec<EducationEntry>,
    #[serde(rename = "hard_skills", default)]
    pub hard_skills: Vec<HardSkill>,
    #[serde(rename = "soft_skills", default)]
    pub soft_skills: Vec<String>,
    #[serde(rename = "cursos", default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "tel", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "local", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(rename = "nascimento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.linkedin.is_none()
            && self.birth_date.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(rename = "titulo", default)]
    pub title: String,
    #[serde(rename = "subtitulo", default)]
    pub subtitle: String,
    #[serde(rename = "periodo", default)]
    pub period: String,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(rename = "curso", default)]
    pub course: String,
    #[serde(rename = "instituicao", default)]
    pub institution: String,
    #[serde(rename = "periodo", default)]
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardSkill {
    #[serde(rename = "nome", default)]
    pub name: String,
    /// Proficiency percentage, `0..=100`.
    #[serde(rename = "nivel", default)]
    pub level: u8,
}

impl ResumeDocument {
    /// The display name used for print titles, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}
