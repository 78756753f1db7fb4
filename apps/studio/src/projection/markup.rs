//! Markup generators for the list containers.
//!
//! Every interpolated value goes through [`escape_html`]; list content can come
//! from uncontrolled input, including AI output.

use crate::models::{EducationEntry, ExperienceEntry, HardSkill};

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One row of the experience/education timeline.
pub struct TimelineRow<'a> {
    pub heading: &'a str,
    pub subheading: &'a str,
    pub period: &'a str,
    pub status: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a ExperienceEntry> for TimelineRow<'a> {
    fn from(e: &'a ExperienceEntry) -> Self {
        Self {
            heading: &e.title,
            subheading: &e.subtitle,
            period: &e.period,
            status: e.status.as_deref(),
            description: e.description.as_deref(),
        }
    }
}

impl<'a> From<&'a EducationEntry> for TimelineRow<'a> {
    fn from(e: &'a EducationEntry) -> Self {
        Self {
            heading: &e.course,
            subheading: &e.institution,
            period: &e.period,
            status: e.status.as_deref(),
            description: None,
        }
    }
}

pub fn render_timeline<'a>(rows: impl IntoIterator<Item = TimelineRow<'a>>) -> String {
    rows.into_iter().map(|row| render_timeline_row(&row)).collect()
}

fn render_timeline_row(row: &TimelineRow<'_>) -> String {
    let status = row
        .status
        .map(|s| {
            format!(
                r#"<span class="tag-status" style="margin-left: 8px; border: 1px solid var(--accent-steel); padding: 1px 5px; font-size: 8pt; border-radius: 3px; font-style: normal;">{}</span>"#,
                escape_html(s)
            )
        })
        .unwrap_or_default();

    let description = row
        .description
        .map(|d| {
            format!(
                r#"<p style="font-size: 10pt; margin-top: 5px; text-align: justify;">{}</p>"#,
                escape_html(d)
            )
        })
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="entry-item" style="margin-bottom: 15px; border-left: 2px solid var(--accent-steel); padding-left: 15px;">"#,
            r#"<div style="display: flex; justify-content: space-between; font-weight: bold; color: var(--primary-dark);">"#,
            "<span>{heading}</span><span>{period}</span></div>",
            r#"<div style="font-style: italic; color: var(--accent-steel); font-size: 10pt;">{subheading}{status}</div>"#,
            "{description}</div>"
        ),
        heading = escape_html(row.heading),
        period = escape_html(row.period),
        subheading = escape_html(row.subheading),
        status = status,
        description = description,
    )
}

pub fn render_hard_skills(skills: &[HardSkill]) -> String {
    skills
        .iter()
        .map(|s| {
            format!(
                concat!(
                    r#"<div class="skill-bar-container" style="margin-bottom: 10px;">"#,
                    r#"<div style="display: flex; justify-content: space-between; font-size: 9pt; font-weight: 600; margin-bottom: 3px;">"#,
                    "<span>{name}</span><span>{level}%</span></div>",
                    r#"<div style="height: 6px; background: #edf2f7; width: 100%; border-radius: 3px;">"#,
                    r#"<div class="skill-bar-fill" style="height: 100%; background: var(--primary-dark); width: {level}%; border-radius: 3px;"></div>"#,
                    "</div></div>"
                ),
                name = escape_html(&s.name),
                level = s.level,
            )
        })
        .collect()
}

pub fn render_pills(tags: &[String]) -> String {
    tags.iter()
        .map(|t| {
            format!(
                r#"<span class="pill" style="display: inline-block; background: var(--primary-dark); color: white; padding: 3px 10px; border-radius: 4px; font-size: 9pt; margin-right: 5px; margin-bottom: 5px;">{}</span>"#,
                escape_html(t)
            )
        })
        .collect()
}

pub fn render_course_items(courses: &[String]) -> String {
    courses
        .iter()
        .map(|c| {
            format!(
                r#"<li style="font-size: 10pt; margin-bottom: 5px; list-style-type: square; color: var(--accent-steel);"><span style="color: #333;">{}</span></li>"#,
                escape_html(c)
            )
        })
        .collect()
}
