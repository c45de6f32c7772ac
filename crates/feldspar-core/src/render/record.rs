//! Record discovery, parsing, and row rendering.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::config::RenderOptions;
use crate::diagnostic::Error;
use crate::format::{format_value, FieldKind};
use crate::schema::Schema;

/// A schema with every field kind classified once, ready for row dispatch.
#[derive(Debug, Clone)]
pub struct PreparedSchema {
    pub name: String,
    order: Vec<String>,
    lookup: HashMap<String, PreparedField>,
}

#[derive(Debug, Clone)]
struct PreparedField {
    label: String,
    kind: FieldKind,
}

impl PreparedSchema {
    /// Classifies every field of the schema against the options. Duplicate
    /// field names collapse last-write-wins, matching the differ.
    pub fn prepare(schema: &Schema, options: &RenderOptions) -> Self {
        let mut order = Vec::with_capacity(schema.fields.len());
        let mut lookup = HashMap::with_capacity(schema.fields.len());

        for field in &schema.fields {
            if !lookup.contains_key(&field.name) {
                order.push(field.name.clone());
            }
            let label = if field.label.trim().is_empty() {
                field.name.clone()
            } else {
                field.label.clone()
            };
            lookup.insert(
                field.name.clone(),
                PreparedField {
                    label,
                    kind: FieldKind::classify(&field.name, None, options),
                },
            );
        }

        Self {
            name: schema.name.clone(),
            order,
            lookup,
        }
    }

    /// Number of declared fields after duplicate collapse.
    pub fn field_count(&self) -> usize {
        self.order.len()
    }
}

/// One rendered row: field name, display label, and the HTML-safe value.
#[derive(Debug, Clone)]
pub struct RenderedField {
    pub name: String,
    pub label: String,
    pub html: String,
}

/// A fully rendered record plus the findings collected along the way.
#[derive(Debug, Clone)]
pub struct RenderedRecord {
    pub rows: Vec<RenderedField>,
    pub warnings: Vec<RenderWarning>,
}

/// Non-fatal render findings. Nothing here stops a run; the caller
/// decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// A record carries a key its schema does not declare. The row is
    /// still rendered, classified on the fly, with the key as label.
    UnknownField { schema: String, field: String },
    /// The current export drifted from the reference document.
    Drift {
        schema: String,
        new_fields: usize,
        removed_fields: usize,
    },
    /// A record produced no rows at all.
    EmptyRecord { path: PathBuf },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::UnknownField { schema, field } => {
                write!(f, "record key '{field}' is not declared by schema '{schema}'")
            }
            RenderWarning::Drift {
                schema,
                new_fields,
                removed_fields,
            } => write!(
                f,
                "schema '{schema}' drifted from the reference: {new_fields} new, {removed_fields} removed"
            ),
            RenderWarning::EmptyRecord { path } => {
                write!(f, "record file '{}' contains no fields", path.display())
            }
        }
    }
}

/// Renders one record into labeled rows.
///
/// With a prepared schema, declared fields come first in schema order and
/// missing values render the placeholder; undeclared record keys follow,
/// each flagged. Without a schema, every key classifies on the fly and
/// the key doubles as the label. Keys outside the schema order come in
/// the record map's deterministic (sorted) order.
pub fn render_record(
    record: &Map<String, Value>,
    prepared: Option<&PreparedSchema>,
    options: &RenderOptions,
) -> RenderedRecord {
    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    match prepared {
        Some(schema) => {
            for name in &schema.order {
                let field = &schema.lookup[name];
                let value = record.get(name).unwrap_or(&Value::Null);
                rows.push(RenderedField {
                    name: name.clone(),
                    label: field.label.clone(),
                    html: format_value(value, field.kind, options),
                });
            }
            for (key, value) in record {
                if schema.lookup.contains_key(key) {
                    continue;
                }
                warnings.push(RenderWarning::UnknownField {
                    schema: schema.name.clone(),
                    field: key.clone(),
                });
                rows.push(on_the_fly_row(key, value, options));
            }
        }
        None => {
            for (key, value) in record {
                rows.push(on_the_fly_row(key, value, options));
            }
        }
    }

    RenderedRecord { rows, warnings }
}

fn on_the_fly_row(key: &str, value: &Value, options: &RenderOptions) -> RenderedField {
    RenderedField {
        name: key.to_string(),
        label: key.to_string(),
        html: format_value(value, FieldKind::classify(key, None, options), options),
    }
}

/// Collects record files: a single `.json` file as-is, a directory walked
/// for `*.json` files in sorted order.
pub fn collect_record_files(path: &Path) -> Result<Vec<PathBuf>, Error> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(Error::NoRecords {
            path: path.to_path_buf(),
        });
    }

    let files: Vec<PathBuf> = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();

    if files.is_empty() {
        return Err(Error::NoRecords {
            path: path.to_path_buf(),
        });
    }
    Ok(files)
}

/// Parses a record file into one or more records. A top-level object is
/// one record; a top-level array must hold only objects.
pub fn load_records(path: &Path) -> Result<Vec<Map<String, Value>>, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e.to_string()))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| Error::RecordParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(record) => records.push(record),
                    _ => {
                        return Err(Error::RecordShape {
                            path: path.to_path_buf(),
                        })
                    }
                }
            }
            Ok(records)
        }
        _ => Err(Error::RecordShape {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDescriptor;
    use serde_json::json;
    use tempfile::TempDir;

    fn make_field(name: &str, label: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            label: label.to_string(),
        }
    }

    fn cart_schema() -> Schema {
        Schema {
            name: "Warenkorb".to_string(),
            fields: vec![
                make_field("position", "Position"),
                make_field("menge", "Menge"),
                make_field("zahlbetrag", "Zahlbetrag"),
            ],
        }
    }

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn prepare_classifies_once_and_collapses_duplicates() {
        let mut schema = cart_schema();
        schema.fields.push(make_field("menge", "Menge (doppelt)"));

        let prepared = PreparedSchema::prepare(&schema, &RenderOptions::default());
        assert_eq!(prepared.field_count(), 3);
    }

    #[test]
    fn blank_labels_fall_back_to_the_field_name() {
        let schema = Schema {
            name: "Warenkorb".to_string(),
            fields: vec![make_field("menge", "  ")],
        };
        let prepared = PreparedSchema::prepare(&schema, &RenderOptions::default());
        let rendered = render_record(
            &record(json!({"menge": 3})),
            Some(&prepared),
            &RenderOptions::default(),
        );
        assert_eq!(rendered.rows[0].label, "menge");
    }

    #[test]
    fn schema_order_drives_the_rows_and_missing_values_render_placeholder() {
        let prepared = PreparedSchema::prepare(&cart_schema(), &RenderOptions::default());
        let rendered = render_record(
            &record(json!({"zahlbetrag": 1500.5, "position": "A-1"})),
            Some(&prepared),
            &RenderOptions::default(),
        );

        let names: Vec<&str> = rendered.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["position", "menge", "zahlbetrag"]);
        assert_eq!(rendered.rows[0].html, "A-1");
        assert_eq!(rendered.rows[1].html, "Nicht verfügbar");
        assert_eq!(rendered.rows[2].html, "1.500,50 €");
        assert!(rendered.warnings.is_empty());
    }

    #[test]
    fn undeclared_keys_are_rendered_and_flagged() {
        let prepared = PreparedSchema::prepare(&cart_schema(), &RenderOptions::default());
        let rendered = render_record(
            &record(json!({"position": "A-1", "geheimnis": "x"})),
            Some(&prepared),
            &RenderOptions::default(),
        );

        assert_eq!(rendered.rows.len(), 4);
        let extra = rendered.rows.last().unwrap();
        assert_eq!(extra.name, "geheimnis");
        assert_eq!(extra.label, "geheimnis");
        assert_eq!(
            rendered.warnings,
            vec![RenderWarning::UnknownField {
                schema: "Warenkorb".to_string(),
                field: "geheimnis".to_string(),
            }]
        );
    }

    #[test]
    fn schema_less_rendering_classifies_on_the_fly() {
        let rendered = render_record(
            &record(json!({"bestelldatum": "2024-03-05", "menge": 3})),
            None,
            &RenderOptions::default(),
        );

        assert_eq!(rendered.rows.len(), 2);
        // Map iteration is sorted by key.
        assert_eq!(rendered.rows[0].name, "bestelldatum");
        assert_eq!(rendered.rows[0].html, "05.03.2024");
        assert_eq!(rendered.rows[1].html, "3");
    }

    #[test]
    fn record_files_are_collected_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let files = collect_record_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(collect_record_files(dir.path()).is_err());
        assert!(collect_record_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn record_files_accept_objects_and_object_arrays() {
        let dir = TempDir::new().unwrap();

        let single = dir.path().join("single.json");
        std::fs::write(&single, r#"{"menge": 1}"#).unwrap();
        assert_eq!(load_records(&single).unwrap().len(), 1);

        let batch = dir.path().join("batch.json");
        std::fs::write(&batch, r#"[{"menge": 1}, {"menge": 2}]"#).unwrap();
        assert_eq!(load_records(&batch).unwrap().len(), 2);

        let scalar = dir.path().join("scalar.json");
        std::fs::write(&scalar, "42").unwrap();
        assert!(load_records(&scalar).is_err());

        let mixed = dir.path().join("mixed.json");
        std::fs::write(&mixed, r#"[{"menge": 1}, 42]"#).unwrap();
        assert!(load_records(&mixed).is_err());
    }
}
