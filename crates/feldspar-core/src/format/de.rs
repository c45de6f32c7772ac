//! Fixed German-locale rendering.
//!
//! The platform the records come from runs de-DE, so rendering is pinned
//! to it: dot thousands grouping, comma decimals, `DD.MM.YYYY` dates, and
//! a trailing euro sign. No locale negotiation happens anywhere.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Formats a number with German grouping and up to three fraction digits,
/// trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    format_grouped(value, 3, true)
}

/// Formats an EUR amount: exactly two decimals and a trailing euro sign,
/// separated by a plain space.
pub fn format_currency_eur(value: f64) -> String {
    format!("{} €", format_grouped(value, 2, false))
}

fn format_grouped(value: f64, decimals: usize, trim: bool) -> String {
    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (rounded.as_str(), ""),
    };

    let grouped = group_thousands(int_part);
    let frac = if trim {
        frac_part.trim_end_matches('0')
    } else {
        frac_part
    };

    // Sign comes from the rounded digits, so -0.0001 never prints "-0".
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac.bytes().all(|b| b == b'0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped},{frac}")
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, byte) in bytes.iter().enumerate() {
        if index > 0 && (bytes.len() - index) % 3 == 0 {
            out.push('.');
        }
        out.push(*byte as char);
    }
    out
}

/// Formats a date as the zero-padded German short form.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Parses a record value as a date.
///
/// Accepts RFC 3339, the bare ISO date, an ISO datetime without zone, and
/// epoch milliseconds as a number or an all-digit string.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(raw) => parse_date_str(raw.trim()),
        Value::Number(number) => number.as_i64().and_then(from_epoch_millis),
        _ => None,
    }
}

fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.date());
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<i64>().ok().and_then(from_epoch_millis);
    }
    None
}

fn from_epoch_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|datetime| datetime.date_naive())
}

/// Parses a record value as a number, accepting the German comma decimal
/// in strings. Strings carrying a dot and a comma at once (already
/// localized, like `1.500,50`) do not parse; neither does anything
/// non-finite.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|f| f.is_finite()),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
                trimmed.replace(',', ".")
            } else {
                trimmed.to_string()
            };
            normalized.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}
