//! `reel build`: the incremental video build.
//!
//! Runs, in order:
//! 1. Orphan reconciliation over dist and the build mirror
//! 2. The incremental transcode of every changed source
//! 3. Mirroring dist into build
//! 4. Pruning empty directories

use reel_cache::{CacheError, LoadStatus};
use reel_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use reel_transcode::{
    emit_mirror_report, emit_reconcile_report, mirror_tree, prune_empty_dirs, run_batch,
    BatchEvent, BatchSummary, FfmpegTransform, OutputStatus,
};

use crate::pipeline::{load_project, render_diagnostics, status, Project};
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Runs the `reel build` command.
///
/// Returns exit code 0 when every attempted output was written, 1 if any failed.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let sink = DiagnosticSink::new();

    if !global.quiet && args.format == ReportFormat::Text {
        let version = &project.config.project.version;
        if version.is_empty() {
            status(global, "Building", &project.config.project.name);
        } else {
            status(
                global,
                "Building",
                format!("{} v{version}", project.config.project.name),
            );
        }
    }

    if !args.no_reconcile {
        reconcile_outputs(&project, &sink, global)?;
    }

    let summary = transcode(&project, &sink, global)?;

    if let Some(build) = project.video.build.as_deref() {
        if !args.no_mirror {
            let report = mirror_tree(&project.video.dist, build);
            emit_mirror_report(&report, &sink);
            if !report.copied.is_empty() {
                status(
                    global,
                    "Mirrored",
                    format!("{} file(s) to {}", report.copied.len(), project.display(build)),
                );
            }
        }
    }

    let pruned: usize = project
        .video
        .destination_roots()
        .into_iter()
        .map(|root| prune_empty_dirs(root).len())
        .sum();
    if global.verbose && pruned > 0 {
        status(global, "Pruned", format!("{pruned} empty director(ies)"));
    }

    match args.format {
        ReportFormat::Text => {
            render_diagnostics(&sink, global, args.format);
            print_summary(&summary, &sink, global);
        }
        ReportFormat::Json => {
            let json = serde_json::json!({
                "summary": summary,
                "diagnostics": sink.diagnostics(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}

/// Removes orphans before transcoding. A missing source root is left for
/// the transcode step to report.
fn reconcile_outputs(
    project: &Project,
    sink: &DiagnosticSink,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = match reel_cache::reconcile(
        &project.tree(),
        &project.video.destination_roots(),
        &project.video.settings,
        &project.store(),
    ) {
        Ok(report) => report,
        Err(CacheError::SourceRootMissing { .. }) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    emit_reconcile_report(&report, sink);
    if global.verbose {
        for path in &report.removed {
            status(global, "Removed", project.display(path));
        }
    }
    if !report.removed.is_empty() {
        status(
            global,
            "Cleaned",
            format!("{} stale output(s)", report.removed.len()),
        );
    }
    Ok(())
}

fn transcode(
    project: &Project,
    sink: &DiagnosticSink,
    global: &GlobalArgs,
) -> Result<BatchSummary, Box<dyn std::error::Error>> {
    let mut ffmpeg = FfmpegTransform::new(&project.video.ffmpeg);
    let summary = run_batch(
        &mut ffmpeg,
        &project.tree(),
        &project.video.dist,
        &project.video.settings,
        &project.store(),
        sink,
        &mut |event| match event {
            BatchEvent::Fresh(source) => {
                if global.verbose {
                    status(global, "Fresh", source);
                }
            }
            BatchEvent::Transcoding { source, reason } => {
                if global.verbose {
                    status(global, "Transcoding", format!("{source} ({reason})"));
                } else {
                    status(global, "Transcoding", source);
                }
            }
            BatchEvent::Output(output) => {
                if global.verbose {
                    let verb = match output.status {
                        OutputStatus::Ok => "Wrote",
                        OutputStatus::Failed(_) => "Failed",
                    };
                    status(global, verb, project.display(&output.path));
                }
            }
            BatchEvent::Finished(_) => {}
        },
    )?;

    if global.verbose && summary.manifest_status == Some(LoadStatus::Reset) {
        sink.emit(
            Diagnostic::note(
                DiagnosticCode::MANIFEST_RESET,
                "video manifest was unreadable and has been reset; every source was rebuilt",
            )
            .with_path(&project.video.manifest),
        );
    }
    Ok(summary)
}

fn print_summary(summary: &BatchSummary, sink: &DiagnosticSink, global: &GlobalArgs) {
    if summary.stage_skipped {
        status(global, "Skipped", "video stage");
        return;
    }
    let verb = if summary.has_failures() {
        "Finished with errors"
    } else {
        "Finished"
    };
    status(
        global,
        verb,
        format!(
            "{} transcoded, {} fresh, {} output(s) written, {} failed, {} warning(s)",
            summary.transcoded,
            summary.skipped,
            summary.outputs_ok,
            summary.outputs_failed,
            sink.warning_count()
        ),
    );
}
