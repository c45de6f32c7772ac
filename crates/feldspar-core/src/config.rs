//! Renderer configuration and display options.

use std::path::PathBuf;

/// Configuration for a render run.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Current schema document, as exported from the platform.
    pub schemas_path: PathBuf,
    /// Reference schema document. When set and present on disk, drift
    /// against it is reported as warnings on the render summary.
    pub reference_path: Option<PathBuf>,
    /// A record file, or a directory of record files.
    pub records_path: PathBuf,
    /// Directory the rendered fragments are written to.
    pub out_dir: PathBuf,
    /// Schema the records belong to. `None` renders schema-less: keys are
    /// classified on the fly and labels fall back to the key.
    pub schema: Option<String>,
    /// Display options.
    pub options: RenderOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            schemas_path: PathBuf::from("schemas.json"),
            reference_path: Some(PathBuf::from("schemas.lock.json")),
            records_path: PathBuf::from("records"),
            out_dir: PathBuf::from("rendered"),
            schema: None,
            options: RenderOptions::default(),
        }
    }
}

/// Display options for field classification and formatting.
///
/// One instance is built per run and passed down explicitly; nothing in the
/// formatter reads process-global state.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Text shown for missing values.
    pub placeholder: String,
    /// Base URL the percent-encoded tracking code is appended to.
    pub tracking_url: String,
    /// Keys and display-target ids holding a carrier tracking code.
    /// Matched exactly, case-insensitive.
    pub tracking_keys: Vec<String>,
    /// Keys always rendered as a checkbox, whatever the value.
    /// Matched exactly, case-insensitive.
    pub boolean_keys: Vec<String>,
    /// Substrings marking a key as a date field.
    pub date_markers: Vec<String>,
    /// Substrings marking a key as an EUR amount.
    pub currency_markers: Vec<String>,
    /// Substrings marking a key as a plain count.
    pub count_markers: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            placeholder: "Nicht verfügbar".to_string(),
            tracking_url:
                "https://www.dhl.de/de/privatkunden/pakete-empfangen/verfolgen.html?piececode="
                    .to_string(),
            tracking_keys: owned(&["sendungsnummer", "trackingnummer", "tracking_number"]),
            boolean_keys: owned(&["storniert", "bezahlt", "express", "newsletter"]),
            date_markers: owned(&["date", "datum"]),
            currency_markers: owned(&["amount", "preis", "betrag", "zahlbetrag"]),
            count_markers: owned(&["menge", "anzahl", "stück", "quantity", "wert", "molliwert"]),
        }
    }
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|entry| entry.to_string()).collect()
}
