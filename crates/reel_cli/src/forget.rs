//! `reel forget`: the deletion hook for external file watchers.

use std::path::Path;

use reel_diagnostics::DiagnosticSink;
use reel_transcode::emit_removal_report;

use crate::pipeline::{load_project, render_diagnostics, status};
use crate::{GlobalArgs, ReportFormat};

/// Runs the `reel forget <source>` command.
///
/// Deletes every output of the named source from dist and the build mirror
/// and drops its manifest entry. Does nothing while the source still exists.
pub fn run(source: &str, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let tree = project.tree();

    let given = Path::new(source);
    // Relative paths may be given from the project root or from the source root.
    let anchored = project.dir.join(given);
    let candidate = if !given.is_absolute() && anchored.starts_with(tree.root()) {
        anchored
    } else {
        given.to_path_buf()
    };
    let rel = tree.relativize(&candidate).ok_or_else(|| {
        format!(
            "'{source}' is not inside the source directory {}",
            project.display(tree.root())
        )
    })?;

    let sink = DiagnosticSink::new();
    let report = reel_cache::remove_source(
        &tree,
        &rel,
        &project.video.destination_roots(),
        &project.video.settings,
        &project.store(),
    );
    emit_removal_report(&report, &sink);

    if report.source_present {
        status(global, "Kept", format!("{source} (source still exists)"));
    } else {
        if global.verbose {
            for path in &report.removed {
                status(global, "Removed", project.display(path));
            }
        }
        status(
            global,
            "Forgot",
            format!("{source} ({} file(s) removed)", report.removed.len()),
        );
    }

    render_diagnostics(&sink, global, ReportFormat::Text);
    Ok(0)
}
