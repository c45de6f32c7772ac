//! Schema drift detection.
//!
//! Compares the reference document's schemas against a current export and
//! reports, per current schema, which fields are new, which disappeared,
//! and how many match. Comparison is by exact field name; labels never
//! affect the result.
//!
//! Iteration is driven by the current document: schemas that exist only in
//! the reference produce no report entry. [`reference_only`] names them so
//! callers can flag the omission.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::document::{FieldDescriptor, Schema};

/// Whether a current schema exists in the reference document at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaStatus {
    /// The reference document carries a schema of this name.
    Known,
    /// The schema is absent from the reference; every field counts as new.
    NotInSchema,
}

/// Drift report for a single schema.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDiff {
    /// Schema name, as spelled in the current document.
    pub schema: String,
    pub status: SchemaStatus,
    /// Fields in the current schema the reference lacks, in current order.
    pub new_fields: Vec<FieldDescriptor>,
    /// Fields in the reference the current schema lacks, in reference order.
    pub removed_fields: Vec<FieldDescriptor>,
    /// Count of field names present on both sides.
    pub matching_fields: usize,
}

impl SchemaDiff {
    /// Whether anything was added or removed.
    pub fn has_changes(&self) -> bool {
        !self.new_fields.is_empty() || !self.removed_fields.is_empty()
    }

    /// Whether applying this drift would lose fields existing display
    /// targets rely on.
    pub fn is_destructive(&self) -> bool {
        !self.removed_fields.is_empty()
    }

    /// Formats the drift for display, one line per field.
    pub fn format_changes(&self) -> String {
        let mut lines = Vec::new();
        for field in &self.new_fields {
            lines.push(format!("  + Field '{}'{}", field.name, label_suffix(field)));
        }
        for field in &self.removed_fields {
            lines.push(format!("  - Field '{}'{}", field.name, label_suffix(field)));
        }
        lines.join("\n")
    }
}

fn label_suffix(field: &FieldDescriptor) -> String {
    if field.label.trim().is_empty() || field.label == field.name {
        String::new()
    } else {
        format!(" ({})", field.label)
    }
}

/// Compares reference schemas against a current export.
///
/// Every current schema yields exactly one entry, drifted or not; result
/// order follows the current document. Duplicate names collapse
/// last-write-wins in the lookup maps.
pub fn diff_schemas(reference: &[Schema], current: &[Schema]) -> Vec<SchemaDiff> {
    let reference_by_name: HashMap<&str, &Schema> = reference
        .iter()
        .map(|schema| (schema.name.as_str(), schema))
        .collect();

    let mut diffs = Vec::with_capacity(current.len());

    for schema in current {
        let Some(reference_schema) = reference_by_name.get(schema.name.as_str()) else {
            diffs.push(SchemaDiff {
                schema: schema.name.clone(),
                status: SchemaStatus::NotInSchema,
                new_fields: schema.fields.clone(),
                removed_fields: Vec::new(),
                matching_fields: 0,
            });
            continue;
        };

        let reference_names: HashSet<&str> = reference_schema
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .collect();
        let current_names: HashSet<&str> = schema
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .collect();

        let new_fields: Vec<FieldDescriptor> = schema
            .fields
            .iter()
            .filter(|field| !reference_names.contains(field.name.as_str()))
            .cloned()
            .collect();
        let removed_fields: Vec<FieldDescriptor> = reference_schema
            .fields
            .iter()
            .filter(|field| !current_names.contains(field.name.as_str()))
            .cloned()
            .collect();
        let matching_fields = current_names
            .iter()
            .filter(|name| reference_names.contains(*name))
            .count();

        diffs.push(SchemaDiff {
            schema: schema.name.clone(),
            status: SchemaStatus::Known,
            new_fields,
            removed_fields,
            matching_fields,
        });
    }

    diffs
}

/// Names of schemas that exist only in the reference document, in
/// reference order.
///
/// The drift report itself never includes these; this exists so callers
/// can point out what the report is silent about.
pub fn reference_only<'a>(reference: &'a [Schema], current: &[Schema]) -> Vec<&'a str> {
    let current_names: HashSet<&str> =
        current.iter().map(|schema| schema.name.as_str()).collect();

    let mut seen = HashSet::new();
    reference
        .iter()
        .map(|schema| schema.name.as_str())
        .filter(|name| !current_names.contains(name) && seen.insert(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_field(name: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            label: humanize(name),
        }
    }

    fn humanize(name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn make_schema(name: &str, fields: &[&str]) -> Schema {
        Schema {
            name: name.to_string(),
            fields: fields.iter().map(|field| make_field(field)).collect(),
        }
    }

    #[test]
    fn identical_documents_show_no_drift() {
        let reference = vec![make_schema("Warenkorb", &["position", "menge"])];
        let current = vec![make_schema("Warenkorb", &["position", "menge"])];

        let diffs = diff_schemas(&reference, &current);
        assert_eq!(diffs.len(), 1);
        assert!(!diffs[0].has_changes());
        assert_eq!(diffs[0].status, SchemaStatus::Known);
        assert_eq!(diffs[0].matching_fields, 2);
    }

    #[test]
    fn added_field_is_reported_in_current_order() {
        let reference = vec![make_schema("Warenkorb", &["position", "menge"])];
        let current = vec![make_schema("Warenkorb", &["position", "menge", "neues_feld"])];

        let diffs = diff_schemas(&reference, &current);
        assert_eq!(diffs[0].new_fields.len(), 1);
        assert_eq!(diffs[0].new_fields[0].name, "neues_feld");
        assert!(diffs[0].removed_fields.is_empty());
        assert_eq!(diffs[0].matching_fields, 2);
        assert!(diffs[0].has_changes());
        assert!(!diffs[0].is_destructive());
    }

    #[test]
    fn removed_field_keeps_reference_order() {
        let reference = vec![make_schema("Warenkorb", &["position", "menge", "rabatt"])];
        let current = vec![make_schema("Warenkorb", &["position"])];

        let diffs = diff_schemas(&reference, &current);
        let removed: Vec<&str> = diffs[0]
            .removed_fields
            .iter()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(removed, vec!["menge", "rabatt"]);
        assert!(diffs[0].is_destructive());
    }

    #[test]
    fn missing_reference_schema_flags_not_in_schema() {
        let reference = vec![make_schema("Warenkorb", &["position"])];
        let current = vec![make_schema("Retoure", &["grund", "datum"])];

        let diffs = diff_schemas(&reference, &current);
        assert_eq!(diffs[0].status, SchemaStatus::NotInSchema);
        assert_eq!(diffs[0].new_fields.len(), 2);
        assert_eq!(diffs[0].matching_fields, 0);
        assert!(diffs[0].removed_fields.is_empty());
    }

    #[test]
    fn empty_reference_marks_every_field_new() {
        let current = vec![
            make_schema("Warenkorb", &["position", "menge"]),
            make_schema("Retoure", &["grund"]),
        ];

        let diffs = diff_schemas(&[], &current);
        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|diff| diff.status == SchemaStatus::NotInSchema));
        assert_eq!(diffs[0].new_fields.len(), 2);
        assert_eq!(diffs[1].new_fields.len(), 1);
    }

    #[test]
    fn result_order_follows_the_current_document() {
        let reference = vec![
            make_schema("Retoure", &["grund"]),
            make_schema("Warenkorb", &["position"]),
        ];
        let current = vec![
            make_schema("Warenkorb", &["position"]),
            make_schema("Retoure", &["grund"]),
        ];

        let names: Vec<String> = diff_schemas(&reference, &current)
            .into_iter()
            .map(|diff| diff.schema)
            .collect();
        assert_eq!(names, vec!["Warenkorb", "Retoure"]);
    }

    #[test]
    fn reference_only_schemas_produce_no_entry() {
        let reference = vec![
            make_schema("Warenkorb", &["position"]),
            make_schema("Altlast", &["uralt"]),
        ];
        let current = vec![make_schema("Warenkorb", &["position"])];

        let diffs = diff_schemas(&reference, &current);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].schema, "Warenkorb");

        assert_eq!(reference_only(&reference, &current), vec!["Altlast"]);
    }

    #[test]
    fn label_differences_still_match() {
        let reference = vec![Schema {
            name: "Warenkorb".to_string(),
            fields: vec![FieldDescriptor {
                name: "menge".to_string(),
                label: "Menge".to_string(),
            }],
        }];
        let current = vec![Schema {
            name: "Warenkorb".to_string(),
            fields: vec![FieldDescriptor {
                name: "menge".to_string(),
                label: "Stückzahl".to_string(),
            }],
        }];

        let diffs = diff_schemas(&reference, &current);
        assert!(!diffs[0].has_changes());
        assert_eq!(diffs[0].matching_fields, 1);
    }

    #[test]
    fn duplicate_field_names_collapse_in_the_lookup() {
        let reference = vec![make_schema("Warenkorb", &["menge", "menge"])];
        let current = vec![make_schema("Warenkorb", &["menge"])];

        let diffs = diff_schemas(&reference, &current);
        assert!(!diffs[0].has_changes());
        assert_eq!(diffs[0].matching_fields, 1);
    }

    #[test]
    fn format_changes_lists_added_then_removed() {
        let reference = vec![make_schema("Warenkorb", &["rabatt"])];
        let current = vec![make_schema("Warenkorb", &["neues_feld"])];

        let text = diff_schemas(&reference, &current)[0].format_changes();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("+ Field 'neues_feld'"));
        assert!(lines[1].contains("- Field 'rabatt'"));
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let value = serde_json::to_value(SchemaStatus::NotInSchema).unwrap();
        assert_eq!(value, serde_json::json!("not_in_schema"));
        let value = serde_json::to_value(SchemaStatus::Known).unwrap();
        assert_eq!(value, serde_json::json!("known"));
    }
}
