//! Schema documents, drift detection, and the reference lifecycle.
//!
//! Three rules shape this module:
//!
//! 1. Documents are loaded fresh on every run; nothing is cached between
//!    runs.
//! 2. The committed reference file plays the lock-file role: `sync`
//!    regenerates it from a current export and refuses destructive drift
//!    unless forced.
//! 3. Drift reporting is driven by the current export. Reference-only
//!    schemas stay out of the report and are surfaced separately.

pub mod diff;
pub mod document;
pub mod reference;
pub mod validate;

pub use diff::{diff_schemas, reference_only, SchemaDiff, SchemaStatus};
pub use document::{FieldDescriptor, Schema, SchemaDocument, DOCUMENT_VERSION};
pub use reference::sync_reference;
pub use validate::{validate_document, ValidationIssue};
