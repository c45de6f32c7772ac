//! End-to-end drift checks against documents on disk.

use feldspar_core::schema::{
    diff_schemas, reference_only, sync_reference, FieldDescriptor, Schema, SchemaDocument,
};
use tempfile::TempDir;

fn make_field(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        label: label.to_string(),
    }
}

fn cart_schema(with_new_field: bool) -> Schema {
    let mut fields = vec![
        make_field("position", "Position"),
        make_field("menge", "Menge"),
    ];
    if with_new_field {
        fields.push(make_field("neues_feld", "Neues Feld"));
    }
    Schema {
        name: "Warenkorb".to_string(),
        fields,
    }
}

fn export(schemas: Vec<Schema>) -> SchemaDocument {
    SchemaDocument {
        version: None,
        generated_at: None,
        generator: None,
        schemas,
    }
}

#[test]
fn sync_then_rediff_reports_no_drift() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("schemas.lock.json");

    let current = export(vec![cart_schema(false)]);
    let reference = sync_reference(&current, None, false, "feldspar 0.1.0").unwrap();
    reference.save(&reference_path).unwrap();

    let loaded = SchemaDocument::load_optional(&reference_path)
        .unwrap()
        .expect("reference document should exist after sync");
    assert!(loaded.generated_at.is_some());

    let diffs = diff_schemas(&loaded.schemas, &current.schemas);
    assert_eq!(diffs.len(), 1);
    assert!(diffs.iter().all(|diff| !diff.has_changes()));
}

#[test]
fn drift_appears_after_the_platform_adds_a_field() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("schemas.lock.json");

    let old_export = export(vec![cart_schema(false)]);
    sync_reference(&old_export, None, false, "feldspar 0.1.0")
        .unwrap()
        .save(&reference_path)
        .unwrap();

    let new_export = export(vec![cart_schema(true)]);
    let reference = SchemaDocument::load(&reference_path).unwrap();

    let diffs = diff_schemas(&reference.schemas, &new_export.schemas);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].new_fields.len(), 1);
    assert_eq!(diffs[0].new_fields[0].name, "neues_feld");
    assert!(diffs[0].removed_fields.is_empty());
    assert_eq!(diffs[0].matching_fields, 2);
    assert!(!diffs[0].is_destructive());
}

#[test]
fn destructive_resync_needs_force() {
    let full = export(vec![cart_schema(true)]);
    let shrunk = export(vec![cart_schema(false)]);

    let reference = sync_reference(&full, None, false, "feldspar 0.1.0").unwrap();

    let refused = sync_reference(&shrunk, Some(&reference), false, "feldspar 0.1.0");
    assert!(refused.is_err());

    let forced = sync_reference(&shrunk, Some(&reference), true, "feldspar 0.1.0").unwrap();
    assert_eq!(forced.schemas, shrunk.schemas);
}

#[test]
fn reference_only_schemas_are_flagged_but_not_reported() {
    let reference = export(vec![
        cart_schema(false),
        Schema {
            name: "Altbestand".to_string(),
            fields: vec![make_field("uralt", "Uralt")],
        },
    ]);
    let current = export(vec![cart_schema(false)]);

    let diffs = diff_schemas(&reference.schemas, &current.schemas);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].schema, "Warenkorb");

    let silent = reference_only(&reference.schemas, &current.schemas);
    assert_eq!(silent, vec!["Altbestand"]);
}

#[test]
fn reference_file_survives_a_disk_roundtrip_unchanged() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("nested").join("schemas.lock.json");

    let current = export(vec![cart_schema(true)]);
    let reference = sync_reference(&current, None, false, "feldspar 0.1.0").unwrap();
    reference.save(&reference_path).unwrap();

    let loaded = SchemaDocument::load(&reference_path).unwrap();
    assert_eq!(loaded, reference);

    let raw = std::fs::read_to_string(&reference_path).unwrap();
    assert!(raw.contains("\"generatedAt\""));
    assert!(raw.contains("\"generator\""));
}
