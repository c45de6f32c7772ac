//! # Feldspar
//!
//! Schema drift detection and record rendering for helpdesk custom
//! objects.
//!
//! Two documents drive everything: a committed *reference* schema document
//! and a *current* export of the platform's schema store. The differ
//! reports drift between them per schema; the renderer formats record
//! exports into HTML fragments using a fixed German locale.
//!
//! ```text
//! schemas.json ──────┐
//!                    ▼
//!             ┌──────────────┐      ┌──────────────┐
//!             │    Schema    │      │    Drift     │
//! schemas     │   documents  │─────▸│    report    │
//! .lock.json ─│    (serde)   │      │ new/removed/ │
//!             └──────┬───────┘      │   matching   │
//!                    │              └──────────────┘
//!                    ▼
//!             ┌──────────────┐      ┌──────────────┐
//! records/    │  Classify &  │      │   Rendered   │
//! *.json ────▸│    format    │─────▸│   fragments  │
//!             │    (de-DE)   │      │   (*.html)   │
//!             └──────────────┘      └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use feldspar_core::{RenderConfig, Renderer};
//!
//! let config = RenderConfig {
//!     schema: Some("Warenkorb".to_string()),
//!     ..RenderConfig::default()
//! };
//!
//! let summary = Renderer::new(config).run()?;
//! println!("rendered {} records", summary.records);
//! ```

pub mod config;
pub mod diagnostic;
pub mod format;
pub mod render;
pub mod schema;

use std::path::Path;

pub use config::{RenderConfig, RenderOptions};
pub use diagnostic::Error;

use render::{PreparedSchema, RenderWarning};
use schema::SchemaDocument;

/// Orchestrates a full render run.
pub struct Renderer {
    config: RenderConfig,
}

/// Result of a successful render run.
#[derive(Debug)]
pub struct RenderSummary {
    /// Number of records rendered.
    pub records: usize,
    /// Number of field rows across all fragments.
    pub fields: usize,
    /// Findings collected along the way. Nothing in here stops a run.
    pub warnings: Vec<RenderWarning>,
}

impl Renderer {
    /// Creates a renderer with the given configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Renders every record into an HTML fragment file.
    ///
    /// Pipeline:
    /// 1. Load the current schema document
    /// 2. Diff against the reference document, when one is configured
    /// 3. Prepare the target schema (classify field kinds once)
    /// 4. Discover and parse the record files
    /// 5. Render rows and write one fragment per record
    pub fn run(&self) -> Result<RenderSummary, Error> {
        // Phase 1: current document.
        let current = SchemaDocument::load(&self.config.schemas_path)?;

        let mut warnings = Vec::new();

        // Phase 2: the drift check is advisory, rendering proceeds either way.
        if let Some(reference_path) = &self.config.reference_path {
            if let Some(reference) = SchemaDocument::load_optional(reference_path)? {
                for diff in schema::diff_schemas(&reference.schemas, &current.schemas) {
                    if diff.has_changes() {
                        warnings.push(RenderWarning::Drift {
                            schema: diff.schema.clone(),
                            new_fields: diff.new_fields.len(),
                            removed_fields: diff.removed_fields.len(),
                        });
                    }
                }
            }
        }

        // Phase 3: resolve the target schema.
        let prepared = match &self.config.schema {
            Some(name) => match current.schema(name) {
                Some(found) => Some(PreparedSchema::prepare(found, &self.config.options)),
                None => {
                    let names = current.schema_names();
                    let available = if names.is_empty() {
                        "(none)".to_string()
                    } else {
                        names.join(", ")
                    };
                    return Err(Error::UnknownSchema {
                        name: name.clone(),
                        available,
                    });
                }
            },
            None => None,
        };

        // Phases 4 and 5.
        let files = render::collect_record_files(&self.config.records_path)?;
        std::fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| Error::write(&self.config.out_dir, e.to_string()))?;

        let mut records = 0usize;
        let mut fields = 0usize;

        for file in files {
            let parsed = render::load_records(&file)?;
            let multiple = parsed.len() > 1;

            for (index, record) in parsed.iter().enumerate() {
                let rendered =
                    render::render_record(record, prepared.as_ref(), &self.config.options);
                if rendered.rows.is_empty() {
                    warnings.push(RenderWarning::EmptyRecord { path: file.clone() });
                }
                warnings.extend(rendered.warnings.iter().cloned());
                fields += rendered.rows.len();
                records += 1;

                let out_path = self.config.out_dir.join(fragment_name(&file, index, multiple));
                std::fs::write(&out_path, render::fragment(&rendered))
                    .map_err(|e| Error::write(&out_path, e.to_string()))?;
            }
        }

        Ok(RenderSummary {
            records,
            fields,
            warnings,
        })
    }
}

/// `order.json` becomes `order.html`; array files append the record
/// index, `order.0.html`.
fn fragment_name(file: &Path, index: usize, multiple: bool) -> String {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "record".to_string());
    if multiple {
        format!("{stem}.{index}.html")
    } else {
        format!("{stem}.html")
    }
}
