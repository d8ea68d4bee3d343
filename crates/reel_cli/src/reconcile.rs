//! `reel reconcile`: remove orphaned outputs on demand.

use reel_cache::CacheError;
use reel_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use reel_transcode::emit_reconcile_report;

use crate::pipeline::{load_project, render_diagnostics, status};
use crate::{GlobalArgs, ReportFormat};

/// Runs the `reel reconcile` command.
///
/// A missing source directory is reported as a warning and nothing is
/// deleted. Returns exit code 0.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let sink = DiagnosticSink::new();

    match reel_cache::reconcile(
        &project.tree(),
        &project.video.destination_roots(),
        &project.video.settings,
        &project.store(),
    ) {
        Ok(report) => {
            emit_reconcile_report(&report, &sink);
            for path in &report.removed {
                if global.verbose {
                    status(global, "Removed", project.display(path));
                }
            }
            status(
                global,
                "Reconciled",
                format!(
                    "{} source(s), {} stale output(s) removed, {} manifest entr(ies) dropped",
                    report.sources,
                    report.removed.len(),
                    report.pruned_entries.len()
                ),
            );
        }
        Err(CacheError::SourceRootMissing { path }) => {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::SOURCE_DIR_MISSING,
                    "video source directory not found, nothing was removed",
                )
                .with_path(path),
            );
        }
        Err(e) => return Err(e.into()),
    }

    render_diagnostics(&sink, global, ReportFormat::Text);
    Ok(0)
}
