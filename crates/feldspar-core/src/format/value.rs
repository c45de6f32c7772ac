//! The value formatting rule chain.
//!
//! Rules run in a fixed order and the first match wins. Output is always
//! HTML-safe, and the chain never fails: keyed parses that go wrong
//! degrade to an empty string rather than leaking `NaN` text.

use serde_json::Value;

use crate::config::RenderOptions;

use super::de;
use super::kind::FieldKind;

/// Formats a value whose kind was classified ahead of time.
pub fn format_value(value: &Value, kind: FieldKind, options: &RenderOptions) -> String {
    // 1. Tracking link for truthy values.
    if kind == FieldKind::Tracking && !is_falsy(value) {
        let code = raw_text(value);
        return format!(
            "<a href=\"{}{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            options.tracking_url,
            urlencoding::encode(&code),
            escape_html(&code),
        );
    }

    // 2. Checkbox for boolean-like values and boolean-keyed fields.
    if is_boolean_like(value) || kind == FieldKind::Boolean {
        return if is_boolean_like(value) {
            "<input type=\"checkbox\" disabled checked>".to_string()
        } else {
            "<input type=\"checkbox\" disabled>".to_string()
        };
    }

    // 3. Dates: falsy renders empty, unparseable renders the raw text.
    if kind == FieldKind::Date {
        if is_falsy(value) {
            return String::new();
        }
        return match de::parse_date(value) {
            Some(date) => de::format_date(date),
            None => escape_html(&raw_text(value)),
        };
    }

    // 4. EUR amounts; parse failures degrade to empty.
    if kind == FieldKind::Currency {
        return match de::parse_number(value) {
            Some(number) => de::format_currency_eur(number),
            None => String::new(),
        };
    }

    // 5. Plain counts; parse failures degrade to empty.
    if kind == FieldKind::Count {
        return match de::parse_number(value) {
            Some(number) => de::format_number(number),
            None => String::new(),
        };
    }

    // 6. Untyped numerics still format as German numbers.
    if let Some(number) = de::parse_number(value) {
        return de::format_number(number);
    }

    // 7. Fallback: text, or the placeholder for nothing at all.
    match value {
        Value::Null => escape_html(&options.placeholder),
        Value::String(text) if text.is_empty() => escape_html(&options.placeholder),
        Value::String(text) => escape_html(text),
        other => escape_html(&other.to_string()),
    }
}

/// Classifies and formats in one step, for callers without a prepared
/// schema.
pub fn format_field(
    value: &Value,
    key: &str,
    target: Option<&str>,
    options: &RenderOptions,
) -> String {
    format_value(value, FieldKind::classify(key, target, options), options)
}

/// Escapes text for safe interpolation into HTML.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Host-style falsiness: null, false, zero, and the empty string.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|f| f == 0.0),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// The truthy spellings the platform delivers for flags: `true`, `"true"`,
/// `1`, and `"1"`. Everything else, `false` and `"false"` included, is not
/// boolean-like and falls through the chain.
fn is_boolean_like(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() == Some(1.0),
        Value::String(text) => text == "true" || text == "1",
        _ => false,
    }
}

/// Text form of a value for raw emission: strings as-is, everything else
/// in JSON spelling.
fn raw_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
