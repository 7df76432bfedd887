use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::errors::Rejection;

lazy_static! {
    /// Accepts scheme-prefixed forms ("https://host/x", "mailto:someone") and
    /// bare or www-prefixed dotted hosts, with optional path, query and
    /// fragment.
    static ref URL_SHAPE: Regex = Regex::new(
        r"^(?:[A-Za-z]{3,9}:(?://)?[-;:&=+$,\w.@]+|(?:www\.)?[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+)(?:/[+~%/.\w-]*)?(?:\?[-+=&;%@.\w]*)?(?:#[\w]*)?$"
    ).expect("url pattern");
}

pub(crate) fn url_shaped(candidate: &str) -> bool {
    URL_SHAPE.is_match(candidate)
}

/// Best-effort stringification of a scalar. Strings pass through, numbers
/// and booleans stringify; everything else refuses to coerce.
pub(crate) fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A required string field: present, coercible, non-empty.
pub(crate) fn require_text(body: &Value, field: &str) -> Result<String, Rejection> {
    body.get(field)
        .and_then(coerce_text)
        .filter(|text| !text.is_empty())
        .ok_or(Rejection::MissingOrEmptyField)
}
