//! Reference document lifecycle.
//!
//! The committed reference file plays the role of a lock file: `sync`
//! regenerates it from a current export and refuses destructive drift
//! unless forced.

use crate::diagnostic::Error;

use super::diff::{diff_schemas, reference_only};
use super::document::SchemaDocument;

/// Builds the next reference document from a current export.
///
/// Against an existing reference, destructive drift is refused unless
/// `force` is set: any removed fields, and any schema the reference still
/// carries that the current export lost. Additive drift syncs freely.
pub fn sync_reference(
    current: &SchemaDocument,
    existing: Option<&SchemaDocument>,
    force: bool,
    generator: &str,
) -> Result<SchemaDocument, Error> {
    if let Some(reference) = existing {
        if !force {
            let mut changes = Vec::new();

            for diff in diff_schemas(&reference.schemas, &current.schemas) {
                if diff.is_destructive() {
                    changes.push(format!("{}\n{}", diff.schema, diff.format_changes()));
                }
            }
            for name in reference_only(&reference.schemas, &current.schemas) {
                changes.push(format!("{name}\n  - Schema no longer in current export"));
            }

            if !changes.is_empty() {
                return Err(Error::DestructiveDrift {
                    changes: changes.join("\n"),
                });
            }
        }
    }

    Ok(SchemaDocument::reference_from(current, generator))
}
