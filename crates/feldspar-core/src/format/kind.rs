//! Field kind classification.
//!
//! A key is classified once, at schema preparation or on first sight, into
//! a [`FieldKind`]; the formatter then dispatches on the kind instead of
//! re-testing key substrings for every value.

use crate::config::RenderOptions;

/// How values of a field are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Carrier tracking code; truthy values render as a link.
    Tracking,
    /// Checkbox flag, whatever the value.
    Boolean,
    /// German short date.
    Date,
    /// EUR amount, two decimals.
    Currency,
    /// Plain grouped number.
    Count,
    /// No key signal; the value decides.
    Text,
}

impl FieldKind {
    /// Classifies a key, and optionally the display-target id the field is
    /// rendered into, against the configured tables.
    ///
    /// Tests run in rule order: the tracking and boolean sets match the
    /// whole key, the marker tables match by substring. Substring matching
    /// is the contract, so a key like `update` classifies as `Date`.
    pub fn classify(key: &str, target: Option<&str>, options: &RenderOptions) -> FieldKind {
        let key = key.to_lowercase();
        let target = target.map(str::to_lowercase);

        let target_is_tracking = target
            .as_deref()
            .is_some_and(|target| matches_exact(&options.tracking_keys, target));
        if matches_exact(&options.tracking_keys, &key) || target_is_tracking {
            return FieldKind::Tracking;
        }
        if matches_exact(&options.boolean_keys, &key) {
            return FieldKind::Boolean;
        }
        if contains_any(&options.date_markers, &key) {
            return FieldKind::Date;
        }
        if contains_any(&options.currency_markers, &key) {
            return FieldKind::Currency;
        }
        if contains_any(&options.count_markers, &key) {
            return FieldKind::Count;
        }
        FieldKind::Text
    }
}

fn matches_exact(entries: &[String], key: &str) -> bool {
    entries.iter().any(|entry| entry.to_lowercase() == key)
}

fn contains_any(markers: &[String], key: &str) -> bool {
    markers.iter().any(|marker| key.contains(&marker.to_lowercase()))
}
