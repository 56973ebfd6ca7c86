//! Export command

use std::path::Path;

use anyhow::{Context, Result};

use super::output::Output;
use super::report::load_report;
use crate::domain::FilterCriteria;
use crate::export::{DirectorySink, ExportFormat, Exporter};
use crate::storage::{Config, TaskSource};

/// Export the filtered tasks to `out_dir`
///
/// The report is loaded and validated before anything is rendered, so a
/// failed load never writes a file.
pub fn run(
    output: &Output,
    config: &Config,
    source: &dyn TaskSource,
    format: ExportFormat,
    filters: &FilterCriteria,
    out_dir: &Path,
) -> Result<()> {
    let report = load_report(source, filters)?;

    let sink = DirectorySink::new(out_dir);
    let path = sink.path_for(format.file_name());
    let mut exporter = Exporter::new(sink, config.locale().clone(), config.project.layout.clone());

    let outcome = exporter
        .export_report(&report, format)
        .with_context(|| format!("Failed to export {}", path.display()))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "path": path,
            "export": outcome,
        }));
    } else {
        let pages = outcome
            .pages
            .map(|p| format!(", {} page{}", p, if p == 1 { "" } else { "s" }))
            .unwrap_or_default();
        output.success(&format!(
            "Exported {} rows{} to {}",
            outcome.rows,
            pages,
            path.display()
        ));
    }

    Ok(())
}
