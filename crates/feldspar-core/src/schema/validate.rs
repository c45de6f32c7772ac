//! Structural validation of schema documents.

use std::collections::HashSet;
use std::fmt;

use crate::diagnostic::Error;

use super::document::SchemaDocument;

/// A non-fatal finding. The caller decides whether to print or escalate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The document carries no schemas at all.
    EmptyDocument,
    /// A schema declares no fields.
    EmptySchema { schema: String },
    /// Two schemas share a name; lookups resolve to the later one.
    DuplicateSchema { name: String },
    /// A schema declares the same field name twice.
    DuplicateField { schema: String, field: String },
    /// A field has no label; rendering falls back to the field name.
    BlankLabel { schema: String, field: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyDocument => write!(f, "document contains no schemas"),
            ValidationIssue::EmptySchema { schema } => {
                write!(f, "schema '{schema}' has no fields")
            }
            ValidationIssue::DuplicateSchema { name } => {
                write!(f, "duplicate schema name '{name}'")
            }
            ValidationIssue::DuplicateField { schema, field } => {
                write!(f, "schema '{schema}' declares field '{field}' more than once")
            }
            ValidationIssue::BlankLabel { schema, field } => {
                write!(f, "field '{schema}.{field}' has a blank label")
            }
        }
    }
}

/// Validates document structure.
///
/// Blank names are hard errors since neither the differ nor the renderer
/// can address such entries. Everything else comes back as issues.
pub fn validate_document(document: &SchemaDocument) -> Result<Vec<ValidationIssue>, Error> {
    let mut issues = Vec::new();

    if document.schemas.is_empty() {
        issues.push(ValidationIssue::EmptyDocument);
    }

    let mut seen_schemas = HashSet::new();
    for (index, schema) in document.schemas.iter().enumerate() {
        if schema.name.trim().is_empty() {
            return Err(Error::BlankSchemaName { index });
        }
        if !seen_schemas.insert(schema.name.as_str()) {
            issues.push(ValidationIssue::DuplicateSchema {
                name: schema.name.clone(),
            });
        }
        if schema.fields.is_empty() {
            issues.push(ValidationIssue::EmptySchema {
                schema: schema.name.clone(),
            });
        }

        let mut seen_fields = HashSet::new();
        for (field_index, field) in schema.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(Error::BlankFieldName {
                    schema: schema.name.clone(),
                    index: field_index,
                });
            }
            if !seen_fields.insert(field.name.as_str()) {
                issues.push(ValidationIssue::DuplicateField {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
            if field.label.trim().is_empty() {
                issues.push(ValidationIssue::BlankLabel {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
    }

    Ok(issues)
}
