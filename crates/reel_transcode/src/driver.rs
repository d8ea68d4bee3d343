//! Incremental batch driver.
//!
//! For each discovered source, in path order: stat it, compute its
//! signature, apply the skip rule, and, if needed, run the executor. No
//! failure of one source stops the batch. The manifest is saved after every
//! transformed source, so an interrupted run loses at most the source in
//! flight.

use std::path::Path;

use reel_cache::{
    compute_signature, decide, CacheError, Decision, LoadStatus, Manifest, ManifestStore,
    SourceFile, SourceTree, StaleReason,
};
use reel_common::{Signature, SourceStat, TransformSettings};
use reel_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use serde::Serialize;

use crate::executor::{process, OutputResult, OutputStatus, SourceOutcome};
use crate::transform::Transform;

/// A discovered source together with its skip decision.
#[derive(Debug, Clone)]
pub struct PlannedSource {
    /// The source file.
    pub source: SourceFile,
    /// Its current size and mtime.
    pub stat: SourceStat,
    /// Signature of `stat` under the current settings.
    pub signature: Signature,
    /// Whether it would be skipped or transformed.
    pub decision: Decision,
}

/// Progress notifications from [`run_batch`].
#[derive(Debug, Clone, Copy)]
pub enum BatchEvent<'a> {
    /// The source is up to date.
    Fresh(&'a str),
    /// The source is about to be transformed.
    Transcoding {
        /// Manifest key of the source.
        source: &'a str,
        /// Why it is being transformed.
        reason: StaleReason,
    },
    /// One output was attempted.
    Output(&'a OutputResult),
    /// All outputs of a source were attempted.
    Finished(&'a SourceOutcome),
}

/// Aggregated result of a batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    /// `true` if the stage did not run (missing sources or transform unavailable).
    pub stage_skipped: bool,
    /// Number of sources discovered.
    pub sources: usize,
    /// Sources that were transformed.
    pub transcoded: usize,
    /// Sources skipped as fresh.
    pub skipped: usize,
    /// Outputs written.
    pub outputs_ok: usize,
    /// Outputs that failed.
    pub outputs_failed: usize,
    /// How the manifest load went, if it was loaded.
    #[serde(skip)]
    pub manifest_status: Option<LoadStatus>,
    /// Per-source outcomes for transformed sources.
    pub outcomes: Vec<SourceOutcome>,
}

impl BatchSummary {
    /// Returns `true` if any output failed.
    pub fn has_failures(&self) -> bool {
        self.outputs_failed > 0
    }
}

/// Discovers sources and applies the skip rule to each, without side effects.
///
/// Sources that disappear between discovery and stat are left out.
pub fn plan(
    tree: &SourceTree,
    dist: &Path,
    settings: &TransformSettings,
    manifest: &Manifest,
) -> Result<Vec<PlannedSource>, CacheError> {
    let mut planned = Vec::new();
    for source in tree.discover()? {
        let Ok(stat) = SourceStat::read(&source.path) else {
            continue;
        };
        let signature = compute_signature(&stat, settings);
        let decision = decide(manifest.get(&source.key()), signature, dist, stat.modified);
        planned.push(PlannedSource {
            source,
            stat,
            signature,
            decision,
        });
    }
    Ok(planned)
}

/// Runs the incremental transcode over every source of `tree` into `dist`.
///
/// A missing source root, an empty source set, or an unavailable transform
/// is reported as a warning and skips the stage. Per-output failures become
/// `E101` errors in `sink` and never stop the batch. Only an unreadable
/// source tree or invalid pattern is returned as an error.
pub fn run_batch(
    transform: &mut dyn Transform,
    tree: &SourceTree,
    dist: &Path,
    settings: &TransformSettings,
    store: &ManifestStore,
    sink: &DiagnosticSink,
    on_event: &mut dyn FnMut(BatchEvent<'_>),
) -> Result<BatchSummary, CacheError> {
    let mut summary = BatchSummary::default();

    if !tree.exists() {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::SOURCE_DIR_MISSING,
                "video source directory not found, skipping video stage",
            )
            .with_path(tree.root()),
        );
        summary.stage_skipped = true;
        return Ok(summary);
    }

    let (mut manifest, status) = store.load_with_status();
    summary.manifest_status = Some(status);

    let planned = plan(tree, dist, settings, &manifest)?;
    summary.sources = planned.len();
    if planned.is_empty() {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::NO_SOURCES,
                format!("no video sources match '{}'", tree.pattern()),
            )
            .with_path(tree.root()),
        );
        summary.stage_skipped = true;
        return Ok(summary);
    }

    if let Err(e) = transform.available() {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::TOOL_UNAVAILABLE,
                "video transcoder unavailable, skipping video stage",
            )
            .with_note(e.to_string())
            .with_help("install ffmpeg or set `video.ffmpeg` in reel.toml"),
        );
        summary.stage_skipped = true;
        return Ok(summary);
    }

    let mut save_failed = false;
    for item in planned {
        let key = item.source.key();
        let reason = match item.decision {
            Decision::Skip => {
                summary.skipped += 1;
                on_event(BatchEvent::Fresh(&key));
                continue;
            }
            Decision::Transcode(reason) => reason,
        };

        on_event(BatchEvent::Transcoding {
            source: &key,
            reason,
        });
        let outcome = process(
            transform,
            &item.source,
            dist,
            settings,
            item.signature,
            &mut manifest,
        );

        for output in &outcome.outputs {
            on_event(BatchEvent::Output(output));
            if let OutputStatus::Failed(reason) = &output.status {
                sink.emit(
                    Diagnostic::error(
                        DiagnosticCode::OUTPUT_FAILED,
                        format!("failed to produce {} output for {key}", output.kind),
                    )
                    .with_path(&output.path)
                    .with_note(reason.clone()),
                );
            }
        }

        if let Err(e) = store.save(&manifest) {
            if !save_failed {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::MANIFEST_SAVE_FAILED,
                        "could not save the video manifest; the next build will redo this work",
                    )
                    .with_path(store.path())
                    .with_note(e.to_string()),
                );
            }
            save_failed = true;
        }

        summary.transcoded += 1;
        summary.outputs_ok += outcome.ok_count();
        summary.outputs_failed += outcome.failed_count();
        on_event(BatchEvent::Finished(&outcome));
        summary.outcomes.push(outcome);
    }

    Ok(summary)
}
