//! `reel mirror`, `reel prune`, and `reel clean`.

use std::path::{Component, Path};

use reel_diagnostics::DiagnosticSink;
use reel_transcode::{clean_dir, emit_mirror_report, mirror_tree, prune_empty_dirs};

use crate::pipeline::{load_project, render_diagnostics, status};
use crate::{GlobalArgs, ReportFormat};

/// Runs `reel mirror`: copies dist outputs into the build mirror.
pub fn mirror(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let Some(build) = project.video.build.as_deref() else {
        status(global, "Skipped", "mirroring is disabled in reel.toml");
        return Ok(0);
    };

    let sink = DiagnosticSink::new();
    let report = mirror_tree(&project.video.dist, build);
    emit_mirror_report(&report, &sink);
    status(
        global,
        "Mirrored",
        format!(
            "{} file(s) copied, {} up to date",
            report.copied.len(),
            report.unchanged
        ),
    );
    render_diagnostics(&sink, global, ReportFormat::Text);
    Ok(0)
}

/// Runs `reel prune`: removes empty directories below dist and build.
pub fn prune(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let mut total = 0;
    for root in project.video.destination_roots() {
        for dir in prune_empty_dirs(root) {
            if global.verbose {
                status(global, "Removed", project.display(&dir));
            }
            total += 1;
        }
    }
    status(global, "Pruned", format!("{total} empty director(ies)"));
    Ok(0)
}

/// Runs `reel clean`: removes the directories listed under `[clean]`.
pub fn clean(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    for dir in &project.config.clean.dirs {
        if !is_contained(Path::new(dir)) {
            return Err(format!(
                "refusing to clean '{dir}': clean directories must be relative paths inside the project"
            )
            .into());
        }
    }
    for dir in &project.config.clean.dirs {
        let path = project.dir.join(dir);
        if clean_dir(&path)? {
            status(global, "Removed", dir);
        }
    }
    Ok(0)
}

/// Returns `true` for a non-empty relative path without `..` components.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}
