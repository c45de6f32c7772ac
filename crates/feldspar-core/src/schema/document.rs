//! Schema document model and persistence.
//!
//! One document shape serves both sides of a drift check. The raw platform
//! export carries only `schemas`; the committed reference file additionally
//! carries a metadata header stamped by `schema sync`.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::diagnostic::Error;

/// Format version written into reference documents.
pub const DOCUMENT_VERSION: &str = "1.0";

/// One field of a schema: machine name plus human label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Machine name, the record key. Comparison is by this name only.
    pub name: String,
    /// Human label shown next to the rendered value.
    pub label: String,
}

/// A named, ordered collection of field descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Looks up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether a field of this name exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// A schema document: optional metadata header plus the schema list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Document format version. Stamped on reference files, absent on
    /// raw exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// RFC 3339 timestamp of the sync that produced this document.
    #[serde(rename = "generatedAt", default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    /// Tool and version that wrote the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,

    pub schemas: Vec<Schema>,
}

impl SchemaDocument {
    /// Loads a schema document from disk.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::read(path, e.to_string()))?;
        let document: SchemaDocument =
            serde_json::from_str(&content).map_err(|e| Error::DocumentParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(document)
    }

    /// Loads a schema document, returning `Ok(None)` if the file does not
    /// exist. A missing reference is a normal state, not an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, Error> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::load(path)?))
    }

    /// Saves the document as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::write(parent, e.to_string()))?;
            }
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::write(path, e.to_string()))?;
        std::fs::write(path, content).map_err(|e| Error::write(path, e.to_string()))
    }

    /// Builds a reference document from a current export, stamping the
    /// metadata header. Schema and field order is taken over as-is.
    pub fn reference_from(current: &SchemaDocument, generator: &str) -> Self {
        Self {
            version: Some(DOCUMENT_VERSION.to_string()),
            generated_at: Some(Utc::now().to_rfc3339()),
            generator: Some(generator.to_string()),
            schemas: current.schemas.clone(),
        }
    }

    /// Looks up a schema by exact name.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|schema| schema.name == name)
    }

    /// Names of all schemas, in document order.
    pub fn schema_names(&self) -> Vec<&str> {
        self.schemas.iter().map(|schema| schema.name.as_str()).collect()
    }

    /// Total field count across all schemas.
    pub fn field_count(&self) -> usize {
        self.schemas.iter().map(|schema| schema.fields.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_field(name: &str, label: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            label: label.to_string(),
        }
    }

    fn make_document() -> SchemaDocument {
        SchemaDocument {
            version: None,
            generated_at: None,
            generator: None,
            schemas: vec![Schema {
                name: "Warenkorb".to_string(),
                fields: vec![
                    make_field("position", "Position"),
                    make_field("menge", "Menge"),
                ],
            }],
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemas.lock.json");

        let reference = SchemaDocument::reference_from(&make_document(), "feldspar 0.1.0");
        reference.save(&path).unwrap();

        let loaded = SchemaDocument::load(&path).unwrap();
        assert_eq!(loaded, reference);
        assert_eq!(loaded.version.as_deref(), Some(DOCUMENT_VERSION));
        assert_eq!(loaded.generator.as_deref(), Some("feldspar 0.1.0"));
        assert!(loaded.generated_at.is_some());
    }

    #[test]
    fn load_optional_returns_none_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.json");

        let loaded = SchemaDocument::load_optional(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn raw_export_without_metadata_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemas.json");
        std::fs::write(
            &path,
            r#"{ "schemas": [ { "name": "Bestellung", "fields": [ { "name": "preis", "label": "Preis" } ] } ] }"#,
        )
        .unwrap();

        let loaded = SchemaDocument::load(&path).unwrap();
        assert!(loaded.version.is_none());
        assert!(loaded.generated_at.is_none());
        assert_eq!(loaded.schemas.len(), 1);
        assert!(loaded.schemas[0].has_field("preis"));
    }

    #[test]
    fn malformed_document_reports_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{ "schemas": "not an array" }"#).unwrap();

        let err = SchemaDocument::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_schemas_key_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(SchemaDocument::load(&path).is_err());
    }

    #[test]
    fn metadata_header_stays_camel_case_on_disk() {
        let reference = SchemaDocument::reference_from(&make_document(), "feldspar 0.1.0");
        let json = serde_json::to_string(&reference).unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(!json.contains("generated_at"));
    }

    #[test]
    fn field_lookup_is_exact() {
        let document = make_document();
        let schema = document.schema("Warenkorb").unwrap();
        assert!(schema.field("menge").is_some());
        assert!(schema.field("Menge").is_none());
        assert_eq!(document.field_count(), 2);
    }
}
