//! Error types for document loading, drift checks, and rendering.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the toolkit.
///
/// Every failure carries a stable diagnostic code under the `feldspar::`
/// namespace so callers and scripts can match on it.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to read '{}': {message}", .path.display())]
    #[diagnostic(code(feldspar::io::read_error))]
    ReadFailed { path: PathBuf, message: String },

    #[error("Failed to write '{}': {message}", .path.display())]
    #[diagnostic(code(feldspar::io::write_error))]
    WriteFailed { path: PathBuf, message: String },

    // =========================================================================
    // Schema Document Errors
    // =========================================================================
    #[error("Failed to parse schema document '{}': {message}", .path.display())]
    #[diagnostic(
        code(feldspar::schema::parse_error),
        help("Schema documents are JSON of the shape {{ \"schemas\": [ {{ \"name\", \"fields\": [ {{ \"name\", \"label\" }} ] }} ] }}")
    )]
    DocumentParse { path: PathBuf, message: String },

    #[error("Schema at index {index} has a blank name")]
    #[diagnostic(code(feldspar::schema::blank_schema_name))]
    BlankSchemaName { index: usize },

    #[error("Field at index {index} of schema '{schema}' has a blank name")]
    #[diagnostic(code(feldspar::schema::blank_field_name))]
    BlankFieldName { schema: String, index: usize },

    // =========================================================================
    // Reference Errors
    // =========================================================================
    #[error("No reference document found at '{}'", .path.display())]
    #[diagnostic(
        code(feldspar::reference::not_found),
        help("Generate one from the current export with `feldspar schema sync`")
    )]
    ReferenceMissing { path: PathBuf },

    /// Syncing would drop fields or whole schemas the reference still carries.
    #[error("Destructive schema drift:\n{changes}")]
    #[diagnostic(
        code(feldspar::reference::destructive_drift),
        help("Removed fields break existing display targets. Re-run with --force to accept the removals.")
    )]
    DestructiveDrift { changes: String },

    // =========================================================================
    // Render Errors
    // =========================================================================
    #[error("Unknown schema '{name}'")]
    #[diagnostic(
        code(feldspar::render::unknown_schema),
        help("Available schemas: {available}")
    )]
    UnknownSchema { name: String, available: String },

    #[error("Failed to parse record file '{}': {message}", .path.display())]
    #[diagnostic(code(feldspar::render::record_parse_error))]
    RecordParse { path: PathBuf, message: String },

    #[error("Record file '{}' is neither an object nor an array of objects", .path.display())]
    #[diagnostic(code(feldspar::render::record_shape_error))]
    RecordShape { path: PathBuf },

    #[error("No record files found under '{}'", .path.display())]
    #[diagnostic(
        code(feldspar::render::no_records),
        help("Pass a .json file or a directory containing .json record exports")
    )]
    NoRecords { path: PathBuf },
}

impl Error {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::ReadFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::WriteFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}
