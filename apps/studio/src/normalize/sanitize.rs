//! Recursive string sanitizer applied to every parsed payload before it can
//! reach the preview surface.
//!
//! Removal runs to a fixpoint so that fragments which only become dangerous
//! after an inner match is removed (`<scr<script></script>ipt>`) are caught too.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static DANGEROUS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<\s*(script|style|iframe|object|embed)\b[^>]*>.*?<\s*/\s*(script|style|iframe|object|embed)\s*>",
    )
    .expect("static regex")
});

static DANGEROUS_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*/?\s*(script|style|iframe|object|embed)\b[^>]*>?").expect("static regex")
});

static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bon[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("static regex")
});

/// Scheme position only: start of the string or after whitespace, `=`, a quote
/// or `(`, with no space after the colon. `$1` keeps the leading delimiter.
static UNSAFE_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(^|[\s="'(])(?:(?:javascript|vbscript):|data:text/html[^,\s]*,?)(\S)"#)
        .expect("static regex")
});

/// Sanitizes every string inside `value`, recursing through arrays and objects.
/// Object keys are left untouched.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_text(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Strips script-like blocks, event-handler attributes and unsafe URI schemes.
pub fn sanitize_text(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_pass(input: &str) -> String {
    let out = DANGEROUS_BLOCK.replace_all(input, "");
    let out = DANGEROUS_TAG.replace_all(&out, "");
    let out = EVENT_HANDLER.replace_all(&out, "");
    UNSAFE_SCHEME.replace_all(&out, "${1}${2}").into_owned()
}
