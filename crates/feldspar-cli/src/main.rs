//! Feldspar command line interface.
//!
//! Wraps the core crate in four command groups: `check` validates the
//! current schema document, `render` writes HTML fragments, `schema`
//! manages the committed reference document, and `watch` re-reports drift
//! whenever either document changes on disk.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};

use feldspar_core::schema::{
    self, validate_document, SchemaDiff, SchemaDocument, SchemaStatus,
};
use feldspar_core::{RenderConfig, RenderOptions, Renderer};

mod ui;

#[derive(Parser)]
#[command(name = "feldspar")]
#[command(version)]
#[command(about = "Schema drift reports and record rendering for helpdesk custom objects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the current schema document
    Check {
        /// Path to the current schema document
        #[arg(short, long, default_value = "schemas.json")]
        schemas: PathBuf,
    },

    /// Render record exports into HTML fragments
    Render {
        /// Path to the current schema document
        #[arg(short, long, default_value = "schemas.json")]
        schemas: PathBuf,

        /// Reference document used for drift warnings
        #[arg(long, default_value = "schemas.lock.json")]
        reference: PathBuf,

        /// Record file, or a directory of record files
        #[arg(long, default_value = "records")]
        records: PathBuf,

        /// Output directory for the fragments
        #[arg(short, long, default_value = "rendered")]
        out: PathBuf,

        /// Schema the records belong to; omit to render schema-less
        #[arg(long)]
        schema: Option<String>,
    },

    /// Inspect or update the committed reference document
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },

    /// Watch both documents and re-report drift on every change
    Watch {
        /// Path to the current schema document
        #[arg(short, long, default_value = "schemas.json")]
        schemas: PathBuf,

        /// Reference document to diff against
        #[arg(long, default_value = "schemas.lock.json")]
        reference: PathBuf,
    },
}

#[derive(Subcommand)]
enum SchemaAction {
    /// Show reference metadata and a drift summary
    Status {
        /// Path to the current schema document
        #[arg(short, long, default_value = "schemas.json")]
        schemas: PathBuf,

        /// Reference document to diff against
        #[arg(long, default_value = "schemas.lock.json")]
        reference: PathBuf,
    },

    /// Show the full drift report
    Diff {
        /// Path to the current schema document
        #[arg(short, long, default_value = "schemas.json")]
        schemas: PathBuf,

        /// Reference document to diff against
        #[arg(long, default_value = "schemas.lock.json")]
        reference: PathBuf,

        /// Exit non-zero when any drift is present
        #[arg(long)]
        fail_on_drift: bool,
    },

    /// Regenerate the reference document from the current export
    Sync {
        /// Path to the current schema document
        #[arg(short, long, default_value = "schemas.json")]
        schemas: PathBuf,

        /// Reference document to write
        #[arg(long, default_value = "schemas.lock.json")]
        reference: PathBuf,

        /// Accept destructive drift (removed fields or schemas)
        #[arg(long)]
        force: bool,
    },

    /// Delete the reference document
    Reset {
        /// Reference document to delete
        #[arg(long, default_value = "schemas.lock.json")]
        reference: PathBuf,

        /// Confirm the deletion
        #[arg(long)]
        yes_delete_reference: bool,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { schemas } => check_document(&schemas),
        Commands::Render {
            schemas,
            reference,
            records,
            out,
            schema,
        } => render_records(schemas, reference, records, out, schema),
        Commands::Schema { action } => match action {
            SchemaAction::Status { schemas, reference } => schema_status(&schemas, &reference),
            SchemaAction::Diff {
                schemas,
                reference,
                fail_on_drift,
            } => schema_diff(&schemas, &reference, fail_on_drift),
            SchemaAction::Sync {
                schemas,
                reference,
                force,
            } => schema_sync(&schemas, &reference, force),
            SchemaAction::Reset {
                reference,
                yes_delete_reference,
            } => schema_reset(&reference, yes_delete_reference),
        },
        Commands::Watch { schemas, reference } => run_watch_mode(schemas, reference).await,
    }
}

fn check_document(schemas_path: &Path) -> miette::Result<()> {
    let spinner = ui::spinner("Checking schema document...");

    let document = match SchemaDocument::load(schemas_path) {
        Ok(document) => document,
        Err(e) => {
            spinner.finish_and_clear();
            ui::error("Schema document did not load.");
            return Err(e.into());
        }
    };
    let issues = match validate_document(&document) {
        Ok(issues) => issues,
        Err(e) => {
            spinner.finish_and_clear();
            ui::error("Schema document is not usable.");
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    ui::success(&format!(
        "{} schemas, {} fields in '{}'",
        document.schemas.len(),
        document.field_count(),
        schemas_path.display()
    ));
    if issues.is_empty() {
        ui::dim("No findings.");
    } else {
        for issue in &issues {
            ui::warn(&issue.to_string());
        }
    }
    Ok(())
}

fn render_records(
    schemas_path: PathBuf,
    reference_path: PathBuf,
    records_path: PathBuf,
    out_dir: PathBuf,
    schema: Option<String>,
) -> miette::Result<()> {
    let start = Instant::now();
    let spinner = ui::spinner("Rendering records...");

    let config = RenderConfig {
        schemas_path,
        reference_path: Some(reference_path),
        records_path,
        out_dir: out_dir.clone(),
        schema,
        options: RenderOptions::default(),
    };

    match Renderer::new(config).run() {
        Ok(summary) => {
            spinner.finish_and_clear();
            ui::box_header("Render Summary");
            ui::box_line(&format!("Records    {}", summary.records));
            ui::box_line(&format!("Fields     {}", summary.fields));
            ui::box_line(&format!("Output     {}", out_dir.display()));
            ui::box_footer();
            for warning in &summary.warnings {
                ui::warn(&warning.to_string());
            }
            ui::timing(start.elapsed());
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::error("Render run failed.");
            Err(e.into())
        }
    }
}

fn schema_status(schemas_path: &Path, reference_path: &Path) -> miette::Result<()> {
    let current = SchemaDocument::load(schemas_path)?;
    let reference = SchemaDocument::load_optional(reference_path)?;

    ui::box_header("Schema Status");
    ui::box_line(&format!(
        "Current    {} schemas, {} fields",
        current.schemas.len(),
        current.field_count()
    ));
    match &reference {
        Some(reference_doc) => {
            ui::box_line(&format!(
                "Reference  {} schemas, {} fields",
                reference_doc.schemas.len(),
                reference_doc.field_count()
            ));
            ui::box_line(&format!(
                "Synced     {}",
                reference_doc.generated_at.as_deref().unwrap_or("unknown")
            ));
            if let Some(generator) = &reference_doc.generator {
                ui::box_line(&format!("Generator  {generator}"));
            }
        }
        None => ui::box_line("Reference  (none)"),
    }
    ui::box_footer();

    match reference {
        Some(reference_doc) => {
            let diffs = schema::diff_schemas(&reference_doc.schemas, &current.schemas);
            let changed = diffs.iter().filter(|diff| diff.has_changes()).count();
            if changed == 0 {
                ui::success(&format!("No drift across {} schemas.", diffs.len()));
            } else {
                ui::warn(&format!("{changed} of {} schemas drifted.", diffs.len()));
                ui::info("Run `feldspar schema diff` for the full report.");
            }
            let silent = schema::reference_only(&reference_doc.schemas, &current.schemas);
            if !silent.is_empty() {
                ui::dim(&format!(
                    "Reference-only schemas (not compared): {}",
                    silent.join(", ")
                ));
            }
        }
        None => {
            ui::info("No reference document yet. Run `feldspar schema sync` to create one.");
        }
    }
    Ok(())
}

fn schema_diff(
    schemas_path: &Path,
    reference_path: &Path,
    fail_on_drift: bool,
) -> miette::Result<()> {
    let current = SchemaDocument::load(schemas_path)?;
    let Some(reference) = SchemaDocument::load_optional(reference_path)? else {
        ui::info(&format!(
            "No reference document at '{}'.",
            reference_path.display()
        ));
        ui::info("Run `feldspar schema sync` to create one.");
        if fail_on_drift {
            return Err(feldspar_core::Error::ReferenceMissing {
                path: reference_path.to_path_buf(),
            }
            .into());
        }
        return Ok(());
    };

    let diffs = schema::diff_schemas(&reference.schemas, &current.schemas);
    let silent = schema::reference_only(&reference.schemas, &current.schemas);
    let drifted = diffs.iter().any(|diff| diff.has_changes());

    if ui::is_terminal() {
        print_boxed_report(&diffs, &silent);
    } else {
        print_plain_report(&diffs, &silent);
    }

    if drifted && fail_on_drift {
        return Err(miette::miette!("schema drift detected"));
    }
    Ok(())
}

fn print_boxed_report(diffs: &[SchemaDiff], silent: &[&str]) {
    if !diffs.iter().any(|diff| diff.has_changes()) && silent.is_empty() {
        ui::success(&format!("No drift detected across {} schemas.", diffs.len()));
        return;
    }

    ui::box_header("Schema Drift");
    for diff in diffs {
        ui::box_line(&ui::drift_summary(
            &diff.schema,
            diff.new_fields.len(),
            diff.removed_fields.len(),
            diff.matching_fields,
        ));
    }
    ui::box_footer();

    for diff in diffs.iter().filter(|diff| diff.has_changes()) {
        ui::blank();
        let marker = if diff.status == SchemaStatus::NotInSchema {
            " (not in reference)"
        } else {
            ""
        };
        ui::info(&format!("{}{marker}", diff.schema));
        println!("{}", diff.format_changes());
    }

    if !silent.is_empty() {
        ui::blank();
        ui::dim(&format!(
            "Reference-only schemas (not compared): {}",
            silent.join(", ")
        ));
    }
}

/// Plain one-line-per-schema output for pipes and CI logs.
fn print_plain_report(diffs: &[SchemaDiff], silent: &[&str]) {
    for diff in diffs {
        let status = match diff.status {
            SchemaStatus::Known => "known",
            SchemaStatus::NotInSchema => "not_in_schema",
        };
        println!(
            "{}: {} +{} -{} ={}",
            diff.schema,
            status,
            diff.new_fields.len(),
            diff.removed_fields.len(),
            diff.matching_fields
        );
        if diff.has_changes() {
            println!("{}", diff.format_changes());
        }
    }
    for name in silent {
        println!("{name}: reference_only");
    }
}

fn schema_sync(schemas_path: &Path, reference_path: &Path, force: bool) -> miette::Result<()> {
    let spinner = ui::spinner("Syncing reference document...");

    let result = (|| {
        let current = SchemaDocument::load(schemas_path)?;
        let existing = SchemaDocument::load_optional(reference_path)?;
        let was_initial = existing.is_none();
        let reference =
            schema::sync_reference(&current, existing.as_ref(), force, &generator())?;
        reference.save(reference_path)?;
        Ok::<_, feldspar_core::Error>((reference, was_initial))
    })();

    match result {
        Ok((reference, was_initial)) => {
            spinner.finish_and_clear();
            if was_initial {
                ui::info("No reference document existed; generated the first one.");
            }
            ui::success(&format!("Reference updated: {}", reference_path.display()));
            ui::dim(&format!(
                "{} schemas, {} fields captured",
                reference.schemas.len(),
                reference.field_count()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::error("Sync did not go through.");
            Err(e.into())
        }
    }
}

fn schema_reset(reference_path: &Path, confirmed: bool) -> miette::Result<()> {
    if !confirmed {
        ui::warn("This deletes the reference document; the next sync starts from scratch.");
        ui::info("Re-run with --yes-delete-reference to confirm.");
        return Ok(());
    }

    if reference_path.exists() {
        std::fs::remove_file(reference_path)
            .map_err(|e| feldspar_core::Error::write(reference_path, e.to_string()))?;
        ui::success(&format!(
            "Reference document deleted: {}",
            reference_path.display()
        ));
    } else {
        ui::dim(&format!("Nothing to delete at '{}'.", reference_path.display()));
    }
    Ok(())
}

async fn run_watch_mode(schemas_path: PathBuf, reference_path: PathBuf) -> miette::Result<()> {
    ui::box_header("Watch Mode");
    ui::box_line(&format!("Current    {}", schemas_path.display()));
    ui::box_line(&format!("Reference  {}", reference_path.display()));
    ui::box_line("Ctrl-C stops the watch.");
    ui::box_footer();

    let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);

    // 500ms debounce coalesces editor save bursts into one re-run.
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |result: DebounceEventResult| {
            if result.is_ok() {
                let _ = tx.try_send(());
            }
        },
    )
    .map_err(|e| miette::miette!("failed to start file watcher: {e}"))?;

    for dir in watch_dirs(&[&schemas_path, &reference_path]) {
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| miette::miette!("failed to watch '{}': {e}", dir.display()))?;
    }

    report_drift_once(&schemas_path, &reference_path);

    loop {
        tokio::select! {
            received = rx.recv() => {
                if received.is_none() {
                    break;
                }
                ui::blank();
                ui::dim("Change detected.");
                report_drift_once(&schemas_path, &reference_path);
            }
            _ = tokio::signal::ctrl_c() => {
                ui::blank();
                ui::dim("Watch stopped.");
                break;
            }
        }
    }
    Ok(())
}

/// Parent directories of the watched files, deduplicated. Watching the
/// directory instead of the file survives editors that replace on save.
fn watch_dirs(paths: &[&Path]) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for path in paths {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dirs.contains(&parent) {
            dirs.push(parent);
        }
    }
    dirs
}

/// One watch-loop drift pass. Transient errors, like a document caught
/// halfway through a save, are reported and the watch keeps running.
fn report_drift_once(schemas_path: &Path, reference_path: &Path) {
    let start = Instant::now();

    let outcome = (|| {
        let current = SchemaDocument::load(schemas_path)?;
        let reference = SchemaDocument::load_optional(reference_path)?;
        Ok::<_, feldspar_core::Error>((current, reference))
    })();

    match outcome {
        Ok((current, Some(reference))) => {
            let diffs = schema::diff_schemas(&reference.schemas, &current.schemas);
            let changed: Vec<&SchemaDiff> =
                diffs.iter().filter(|diff| diff.has_changes()).collect();
            if changed.is_empty() {
                ui::success(&format!("No drift across {} schemas.", diffs.len()));
            } else {
                for diff in changed {
                    ui::warn(&format!(
                        "{}: +{} -{}",
                        diff.schema,
                        diff.new_fields.len(),
                        diff.removed_fields.len()
                    ));
                }
            }
            ui::timing(start.elapsed());
        }
        Ok((_, None)) => {
            ui::info("No reference document yet; waiting for `feldspar schema sync`.");
        }
        Err(e) => ui::error(&e.to_string()),
    }
}

fn generator() -> String {
    format!("feldspar {}", env!("CARGO_PKG_VERSION"))
}
