//! Validator / normalizer: turns raw editor text into a canonical `ResumeDocument`.
//!
//! Pure functions only. Persisting the accepted text is the caller's job.

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{Contact, EducationEntry, ExperienceEntry, HardSkill, ResumeDocument};

pub mod sanitize;

pub use sanitize::{sanitize_text, sanitize_value};

pub const MAX_SKILL_LEVEL: u8 = 100;

/// Result of validating raw editor text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// Empty or whitespace-only input. Not an error.
    Empty,
    /// Non-empty input that could not be parsed into a document.
    Invalid(String),
    Valid(ResumeDocument),
}

impl NormalizeOutcome {
    pub fn into_document(self) -> Option<ResumeDocument> {
        match self {
            NormalizeOutcome::Valid(doc) => Some(doc),
            _ => None,
        }
    }
}

pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Parses `raw`, returning `None` for empty and malformed input alike.
/// Use [`classify`] when the two cases must be told apart.
pub fn normalize(raw: &str) -> Option<ResumeDocument> {
    classify(raw).into_document()
}

pub fn classify(raw: &str) -> NormalizeOutcome {
    if is_blank(raw) {
        return NormalizeOutcome::Empty;
    }

    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            debug!("Rejected editor input: {e}");
            return NormalizeOutcome::Invalid(e.to_string());
        }
    };

    match sanitize_value(value) {
        Value::Object(map) => NormalizeOutcome::Valid(from_object(&map)),
        other => NormalizeOutcome::Invalid(format!(
            "expected a JSON object at the top level, found {}",
            json_type_name(&other)
        )),
    }
}

/// Serializes a document the way the editor shows it (two-space indentation).
pub fn to_pretty_json(doc: &ResumeDocument) -> String {
    // ResumeDocument only holds strings, integers and sequences.
    serde_json::to_string_pretty(doc).unwrap_or_else(|_| "{}".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Field coercion
// ────────────────────────────────────────────────────────────────────────────

fn from_object(map: &Map<String, Value>) -> ResumeDocument {
    ResumeDocument {
        name: text(map.get("nome")),
        role: text(map.get("cargo")),
        summary: text(map.get("resumo")),
        contact: contact(map.get("contato")),
        experience: objects(map.get("experiencias"))
            .map(|item| ExperienceEntry {
                title: text(item.get("titulo")).unwrap_or_default(),
                subtitle: text(item.get("subtitulo")).unwrap_or_default(),
                period: text(item.get("periodo")).unwrap_or_default(),
                description: text(item.get("descricao")),
                status: status(item.get("status")),
            })
            .collect(),
        education: objects(map.get("formacao"))
            .map(|item| EducationEntry {
                course: text(item.get("curso")).unwrap_or_default(),
                institution: text(item.get("instituicao")).unwrap_or_default(),
                period: text(item.get("periodo")).unwrap_or_default(),
                status: status(item.get("status")),
            })
            .collect(),
        hard_skills: objects(map.get("hard_skills"))
            .map(|item| HardSkill {
                name: text(item.get("nome")).unwrap_or_default(),
                level: level(item.get("nivel")),
            })
            .collect(),
        soft_skills: tags(map.get("soft_skills")),
        courses: tags(map.get("cursos")),
    }
}

fn contact(value: Option<&Value>) -> Contact {
    let Some(Value::Object(map)) = value else {
        return Contact::default();
    };
    Contact {
        email: text(map.get("email")),
        phone: text(map.get("tel")),
        location: text(map.get("local")),
        linkedin: text(map.get("linkedin")),
        birth_date: text(map.get("nascimento")),
    }
}

/// Non-blank strings pass through; numbers are rendered; everything else is absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn status(value: Option<&Value>) -> Option<String> {
    text(value)
        .map(|s| sanitize_text(&s.to_uppercase()))
        .filter(|s| !s.trim().is_empty())
}

fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn tags(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|v| text(Some(v)))
        .collect()
}

/// Coerces a skill level to `0..=100`. Strings are read like an integer
/// prefix (`"80%"` → 80); anything unreadable becomes 0.
fn level(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_int_prefix(s).unwrap_or(0),
        _ => 0,
    };
    raw.clamp(0, MAX_SKILL_LEVEL as i64) as u8
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let mut seen = false;
    let mut acc: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        acc = acc.saturating_mul(10).saturating_add((b - b'0') as i64);
    }

    seen.then_some(if negative { -acc } else { acc })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn doc(value: Value) -> ResumeDocument {
        normalize(&value.to_string()).expect("valid document")
    }

    #[test]
    fn test_blank_input_is_empty_not_invalid() {
        assert_eq!(classify(""), NormalizeOutcome::Empty);
        assert_eq!(classify("   \n\t"), NormalizeOutcome::Empty);
        assert!(normalize("  ").is_none());
    }

    #[test]
    fn test_malformed_input_is_invalid() {
        assert!(matches!(classify("{nome: }"), NormalizeOutcome::Invalid(_)));
        assert!(normalize("{nome: }").is_none());
    }

    #[test]
    fn test_non_object_top_level_is_invalid() {
        assert!(matches!(classify("[1, 2]"), NormalizeOutcome::Invalid(_)));
        assert!(matches!(classify("\"Ana\""), NormalizeOutcome::Invalid(_)));
    }

    #[test]
    fn test_name_only_document() {
        let d = doc(json!({"nome": "Ana Silva"}));
        assert_eq!(d.name.as_deref(), Some("Ana Silva"));
        assert!(d.experience.is_empty());
        assert!(d.education.is_empty());
        assert!(d.hard_skills.is_empty());
        assert!(d.soft_skills.is_empty());
        assert!(d.courses.is_empty());
        assert!(d.contact.is_empty());
    }

    #[test]
    fn test_blank_name_is_absent() {
        let d = doc(json!({
            "nome": "",
            "experiencias": [{"titulo": "Dev", "periodo": "2020-2022"}]
        }));
        assert!(d.name.is_none());
        assert_eq!(d.experience.len(), 1);
        assert_eq!(d.experience[0].title, "Dev");
        assert_eq!(d.experience[0].period, "2020-2022");
        assert_eq!(d.experience[0].subtitle, "");
        assert!(d.experience[0].description.is_none());
    }

    #[test]
    fn test_collections_default_when_missing_null_or_wrong_type() {
        let d = doc(json!({
            "experiencias": null,
            "formacao": "none",
            "hard_skills": {"nome": "SQL"},
            "soft_skills": 12,
            "contato": ["email"]
        }));
        assert!(d.experience.is_empty());
        assert!(d.education.is_empty());
        assert!(d.hard_skills.is_empty());
        assert!(d.soft_skills.is_empty());
        assert!(d.courses.is_empty());
        assert!(d.contact.is_empty());
    }

    #[test]
    fn test_non_object_entries_are_dropped() {
        let d = doc(json!({"experiencias": ["Dev", {"titulo": "QA"}, null]}));
        assert_eq!(d.experience.len(), 1);
        assert_eq!(d.experience[0].title, "QA");
    }

    #[test]
    fn test_entry_order_is_preserved() {
        let d = doc(json!({"experiencias": [
            {"titulo": "Third", "periodo": "2023"},
            {"titulo": "First", "periodo": "2015"},
            {"titulo": "Second", "periodo": "2019"}
        ]}));
        let titles: Vec<_> = d.experience.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Third", "First", "Second"]);
    }

    #[test]
    fn test_level_coercion() {
        let d = doc(json!({"hard_skills": [
            {"nome": "SQL", "nivel": "200"},
            {"nome": "Rust", "nivel": "abc"},
            {"nome": "Go", "nivel": 150},
            {"nome": "C", "nivel": -5},
            {"nome": "Python", "nivel": 55.7},
            {"nome": "Excel", "nivel": "80%"},
            {"nome": "Vim"},
            {"nome": "Bash", "nivel": true},
            {"nome": "Big", "nivel": 1e300},
            {"nome": "Huge", "nivel": "99999999999999999999999"}
        ]}));
        let levels: Vec<u8> = d.hard_skills.iter().map(|s| s.level).collect();
        assert_eq!(levels, [100, 0, 100, 0, 55, 80, 0, 0, 100, 100]);
    }

    #[test]
    fn test_status_is_upper_cased() {
        let d = doc(json!({
            "formacao": [
                {"curso": "ADS", "instituicao": "FATEC", "periodo": "2024", "status": "em andamento"},
                {"curso": "Eng", "instituicao": "USP", "periodo": "2018", "status": ""}
            ],
            "experiencias": [{"titulo": "Dev", "status": "atual"}]
        }));
        assert_eq!(d.education[0].status.as_deref(), Some("EM ANDAMENTO"));
        assert!(d.education[1].status.is_none());
        assert_eq!(d.experience[0].status.as_deref(), Some("ATUAL"));
    }

    #[test]
    fn test_numbers_are_accepted_as_text() {
        let d = doc(json!({"contato": {"tel": 11999990000_i64}, "cursos": [2024, "AWS", ""]}));
        assert_eq!(d.contact.phone.as_deref(), Some("11999990000"));
        assert_eq!(d.courses, ["2024", "AWS"]);
    }

    #[test]
    fn test_strings_are_sanitized() {
        let d = doc(json!({
            "nome": "<script>alert(1)</script>Ana",
            "contato": {"linkedin": "javascript:alert(1)"},
            "soft_skills": ["<img src=x onerror=alert(1)>Lideranca"]
        }));
        assert_eq!(d.name.as_deref(), Some("Ana"));
        assert_eq!(d.contact.linkedin.as_deref(), Some("alert(1)"));
        assert!(!d.soft_skills[0].contains("onerror"));
    }

    #[test]
    fn test_contact_fields() {
        let d = doc(json!({"contato": {
            "email": "ana@example.com",
            "tel": "+55 11 99999-0000",
            "local": "São Paulo",
            "linkedin": "linkedin.com/in/ana",
            "nascimento": "01/02/1995"
        }}));
        assert_eq!(d.contact.email.as_deref(), Some("ana@example.com"));
        assert_eq!(d.contact.location.as_deref(), Some("São Paulo"));
        assert_eq!(d.contact.birth_date.as_deref(), Some("01/02/1995"));
    }

    #[test]
    fn test_pretty_json_round_trip_is_stable() {
        let d = doc(json!({"nome": "Ana", "hard_skills": [{"nome": "SQL", "nivel": "200"}]}));
        assert_eq!(normalize(&to_pretty_json(&d)), Some(d));
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("  42abc"), Some(42));
        assert_eq!(parse_int_prefix("-7"), Some(-7));
        assert_eq!(parse_int_prefix("+3"), Some(3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z0-9 ]{0,12}",
            Just("<script>x</script>".to_string()),
            Just("javascript:".to_string()),
            Just(" onclick=\"y\"".to_string()),
            Just("   ".to_string()),
            Just("em andamento".to_string()),
        ]
    }

    fn text_value() -> impl Strategy<Value = String> {
        proptest::collection::vec(fragment(), 0..4).prop_map(|parts| parts.concat())
    }

    fn level_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            (-1.0e6f64..1.0e6).prop_map(Value::from),
            text_value().prop_map(Value::from),
            Just(Value::Null),
            Just(Value::Bool(true)),
        ]
    }

    fn loose_document() -> impl Strategy<Value = Value> {
        (
            text_value(),
            proptest::collection::vec((text_value(), text_value(), text_value()), 0..4),
            proptest::collection::vec((text_value(), level_value()), 0..4),
            proptest::collection::vec(text_value(), 0..4),
            prop_oneof![Just(Value::Null), Just(json!("oops")), Just(json!({}))],
        )
            .prop_map(|(name, exp, skills, tags, junk)| {
                json!({
                    "nome": name,
                    "experiencias": exp
                        .into_iter()
                        .map(|(t, p, s)| json!({"titulo": t, "periodo": p, "status": s}))
                        .collect::<Vec<_>>(),
                    "hard_skills": skills
                        .into_iter()
                        .map(|(n, l)| json!({"nome": n, "nivel": l}))
                        .collect::<Vec<_>>(),
                    "soft_skills": tags,
                    "formacao": junk,
                })
            })
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(input in loose_document()) {
            let first = normalize(&input.to_string()).expect("object input is valid");
            let second = normalize(&to_pretty_json(&first)).expect("canonical output is valid");
            prop_assert_eq!(first, second);
        }

        #[test]
        fn levels_are_always_in_range(input in loose_document()) {
            let d = normalize(&input.to_string()).expect("object input is valid");
            prop_assert!(d.hard_skills.iter().all(|s| s.level <= MAX_SKILL_LEVEL));
        }

        #[test]
        fn statuses_are_upper_case(input in loose_document()) {
            let d = normalize(&input.to_string()).expect("object input is valid");
            for status in d.experience.iter().filter_map(|e| e.status.as_ref()) {
                prop_assert_eq!(status.clone(), status.to_uppercase());
            }
        }
    }
}
