//! Conversion of cache and tree reports into diagnostics.

use reel_cache::{FileFailure, ReconcileReport, RemovalReport};
use reel_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::tree::MirrorReport;

fn emit_delete_failures(failed: &[FileFailure], sink: &DiagnosticSink) {
    for failure in failed {
        sink.emit(
            Diagnostic::warning(DiagnosticCode::DELETE_FAILED, "could not remove stale output")
                .with_path(&failure.path)
                .with_note(failure.reason.clone()),
        );
    }
}

fn emit_manifest_error(error: Option<&reel_cache::CacheError>, sink: &DiagnosticSink) {
    if let Some(e) = error {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::MANIFEST_SAVE_FAILED,
                "could not save the video manifest",
            )
            .with_note(e.to_string()),
        );
    }
}

/// Emits `W005` for each undeletable orphan and `W004` for a failed manifest save.
pub fn emit_reconcile_report(report: &ReconcileReport, sink: &DiagnosticSink) {
    emit_delete_failures(&report.failed, sink);
    emit_manifest_error(report.manifest_error.as_ref(), sink);
}

/// Emits `W005` for each undeletable output and `W004` for a failed manifest save.
pub fn emit_removal_report(report: &RemovalReport, sink: &DiagnosticSink) {
    emit_delete_failures(&report.failed, sink);
    emit_manifest_error(report.manifest_error.as_ref(), sink);
}

/// Emits `W006` for each file that could not be mirrored.
pub fn emit_mirror_report(report: &MirrorReport, sink: &DiagnosticSink) {
    for failure in &report.failed {
        sink.emit(
            Diagnostic::warning(DiagnosticCode::MIRROR_FAILED, "could not mirror output")
                .with_path(&failure.path)
                .with_note(failure.reason.clone()),
        );
    }
}
