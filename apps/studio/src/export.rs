//! File naming for downloads and print jobs.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Download name of the bundled starter document.
pub const BASE_SCHEMA_FILENAME: &str = "meu_curriculo_base.json";

const FALLBACK_PRINT_NAME: &str = "Curriculo_Profissional";

/// Document title used while printing, which browsers reuse as the PDF file name.
///
/// `"Ana  Maria Silva"` becomes `CV_Ana_Maria_Silva`.
pub fn print_title(name: Option<&str>) -> String {
    let words: Vec<&str> = name.unwrap_or_default().split_whitespace().collect();
    if words.is_empty() {
        format!("CV_{FALLBACK_PRINT_NAME}")
    } else {
        format!("CV_{}", words.join("_"))
    }
}

/// Timestamped name for an exported document, e.g. `curriculo_20261016_153012.json`.
pub fn export_filename<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("curriculo_{}.json", at.format("%Y%m%d_%H%M%S"))
}

pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{filename}\"")
}
