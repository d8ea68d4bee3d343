//! End-to-end behavior of the incremental video build with a fake transcoder.

use std::path::{Path, PathBuf};

use reel_cache::{
    reconcile, remove_source, Decision, ManifestStore, SourceTree, StaleReason,
};
use reel_common::TransformSettings;
use reel_diagnostics::{DiagnosticCode, DiagnosticSink};
use reel_transcode::{
    mirror_tree, plan, run_batch, BatchEvent, BatchSummary, CodecParams, Transform,
    TransformError,
};

/// Records every call and writes a small file, failing for chosen extensions.
#[derive(Default)]
struct Recorder {
    calls: Vec<PathBuf>,
    fail_ext: Vec<&'static str>,
}

impl Transform for Recorder {
    fn transform(
        &mut self,
        input: &Path,
        output: &Path,
        _params: &CodecParams,
    ) -> Result<(), TransformError> {
        self.calls.push(output.to_path_buf());
        let ext = output.extension().and_then(|e| e.to_str()).unwrap_or("");
        if self.fail_ext.contains(&ext) {
            return Err(TransformError::Failed {
                program: PathBuf::from("recorder"),
                status: "exit status: 1".to_string(),
                stderr: format!("cannot encode {}", input.display()),
            });
        }
        std::fs::write(output, b"encoded").map_err(|e| TransformError::Io {
            path: output.to_path_buf(),
            source: e,
        })
    }
}

struct Project {
    _dir: tempfile::TempDir,
    src: PathBuf,
    dist: PathBuf,
    build: PathBuf,
    store: ManifestStore,
}

impl Project {
    fn new(sources: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src/assets/video");
        let dist = dir.path().join("dist/assets/video");
        let build = dir.path().join("build/assets/video");
        for rel in sources {
            let path = src.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"raw video bytes").unwrap();
        }
        let store = ManifestStore::new(dir.path().join(".reel/video-manifest.json"));
        Project {
            src,
            dist,
            build,
            store,
            _dir: dir,
        }
    }

    fn tree(&self) -> SourceTree {
        SourceTree::new(&self.src, "**/*.mp4")
    }

    fn build_with(
        &self,
        transform: &mut Recorder,
        settings: &TransformSettings,
        sink: &DiagnosticSink,
    ) -> BatchSummary {
        run_batch(
            transform,
            &self.tree(),
            &self.dist,
            settings,
            &self.store,
            sink,
            &mut |_| {},
        )
        .unwrap()
    }
}

#[test]
fn second_build_makes_no_transform_calls() {
    let project = Project::new(&["intro.mp4", "hero/loop.mp4"]);
    let settings = TransformSettings::default();
    let sink = DiagnosticSink::new();

    let mut first = Recorder::default();
    let summary = project.build_with(&mut first, &settings, &sink);
    assert_eq!(summary.transcoded, 2);
    assert_eq!(summary.outputs_ok, 10);
    assert_eq!(first.calls.len(), 10);

    let mut second = Recorder::default();
    let summary = project.build_with(&mut second, &settings, &sink);
    assert!(second.calls.is_empty());
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.transcoded, 0);
    assert!(sink.diagnostics().is_empty());
}

#[test]
fn settings_change_forces_retransform() {
    let project = Project::new(&["clip.mp4"]);
    let sink = DiagnosticSink::new();
    let mut settings = TransformSettings::default();
    project.build_with(&mut Recorder::default(), &settings, &sink);

    settings.scaled.enabled = false;
    let manifest = project.store.load();
    let planned = plan(&project.tree(), &project.dist, &settings, &manifest).unwrap();
    assert_eq!(
        planned[0].decision,
        Decision::Transcode(StaleReason::SignatureChanged)
    );

    let mut rerun = Recorder::default();
    project.build_with(&mut rerun, &settings, &sink);
    assert_eq!(rerun.calls.len(), 3);
}

#[test]
fn deleted_output_is_rebuilt() {
    let project = Project::new(&["clip.mp4"]);
    let settings = TransformSettings::default();
    let sink = DiagnosticSink::new();
    project.build_with(&mut Recorder::default(), &settings, &sink);

    std::fs::remove_file(project.dist.join("clip.jpg")).unwrap();
    let mut rerun = Recorder::default();
    let summary = project.build_with(&mut rerun, &settings, &sink);
    assert_eq!(rerun.calls.len(), 5);
    assert_eq!(summary.outcomes[0].source, "clip.mp4");
}

#[test]
fn partial_failure_records_full_list_and_retries_next_run() {
    let project = Project::new(&["clip.mp4", "other.mp4"]);
    let mut settings = TransformSettings::default();
    settings.scaled.enabled = false;
    let sink = DiagnosticSink::new();

    let mut failing = Recorder {
        fail_ext: vec!["webm"],
        ..Recorder::default()
    };
    let summary = project.build_with(&mut failing, &settings, &sink);
    assert_eq!(summary.outputs_failed, 2);
    assert_eq!(summary.outputs_ok, 4);
    assert!(summary.has_failures());
    assert_eq!(failing.calls.len(), 6);
    assert_eq!(sink.error_count(), 2);
    assert!(sink
        .diagnostics()
        .iter()
        .all(|d| d.code == DiagnosticCode::OUTPUT_FAILED));

    let manifest = project.store.load();
    assert_eq!(
        manifest.get("clip.mp4").unwrap().outputs,
        vec!["clip.mp4", "clip.webm", "clip.jpg"]
    );

    let planned = plan(&project.tree(), &project.dist, &settings, &manifest).unwrap();
    assert!(planned
        .iter()
        .all(|p| p.decision == Decision::Transcode(StaleReason::OutputsStale)));

    let mut retry = Recorder::default();
    let summary = project.build_with(&mut retry, &settings, &sink);
    assert_eq!(summary.transcoded, 2);
    assert!(!summary.has_failures());
    assert!(project.dist.join("clip.webm").exists());
}

#[test]
fn corrupt_manifest_degrades_to_full_rebuild() {
    let project = Project::new(&["clip.mp4"]);
    let settings = TransformSettings::default();
    let sink = DiagnosticSink::new();
    project.build_with(&mut Recorder::default(), &settings, &sink);

    std::fs::write(project.store.path(), "{ truncated").unwrap();
    let mut rerun = Recorder::default();
    let summary = project.build_with(&mut rerun, &settings, &sink);
    assert_eq!(summary.manifest_status, Some(reel_cache::LoadStatus::Reset));
    assert_eq!(rerun.calls.len(), 5);
    assert!(project.store.load().get("clip.mp4").is_some());
}

#[test]
fn events_follow_production_order() {
    let project = Project::new(&["clip.mp4"]);
    let mut events = Vec::new();
    run_batch(
        &mut Recorder::default(),
        &project.tree(),
        &project.dist,
        &TransformSettings::default(),
        &project.store,
        &DiagnosticSink::new(),
        &mut |event| {
            events.push(match event {
                BatchEvent::Fresh(s) => format!("fresh {s}"),
                BatchEvent::Transcoding { source, reason } => format!("start {source} ({reason})"),
                BatchEvent::Output(o) => format!("output {}", o.kind),
                BatchEvent::Finished(o) => format!("done {}", o.source),
            })
        },
    )
    .unwrap();

    assert_eq!(
        events,
        vec![
            "start clip.mp4 (not in manifest)",
            "output primary",
            "output secondary",
            "output poster",
            "output scaled-primary",
            "output scaled-secondary",
            "done clip.mp4",
        ]
    );
}

#[test]
fn renamed_source_is_reconciled_across_dist_and_mirror() {
    let project = Project::new(&["a.mp4", "stale.mp4"]);
    let mut settings = TransformSettings::default();
    settings.scaled.enabled = false;
    let sink = DiagnosticSink::new();
    project.build_with(&mut Recorder::default(), &settings, &sink);
    mirror_tree(&project.dist, &project.build);

    std::fs::remove_file(project.src.join("stale.mp4")).unwrap();
    let report = reconcile(
        &project.tree(),
        &[project.dist.as_path(), project.build.as_path()],
        &settings,
        &project.store,
    )
    .unwrap();

    assert_eq!(report.removed.len(), 6);
    assert_eq!(report.pruned_entries, vec!["stale.mp4".to_string()]);
    for root in [&project.dist, &project.build] {
        let mut names: Vec<String> = std::fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.jpg", "a.mp4", "a.webm"]);
    }
}

#[test]
fn removal_hook_clears_one_source() {
    let project = Project::new(&["clip.mp4", "keep.mp4"]);
    let settings = TransformSettings::default();
    let sink = DiagnosticSink::new();
    project.build_with(&mut Recorder::default(), &settings, &sink);
    mirror_tree(&project.dist, &project.build);
    let before = project.store.load();

    std::fs::remove_file(project.src.join("clip.mp4")).unwrap();
    let report = remove_source(
        &project.tree(),
        Path::new("clip.mp4"),
        &[project.dist.as_path(), project.build.as_path()],
        &settings,
        &project.store,
    );

    assert!(report.entry_removed);
    assert_eq!(report.removed.len(), 10);
    assert!(!project.dist.join("clip-75.webm").exists());
    assert!(!project.build.join("clip.mp4").exists());
    assert!(project.build.join("keep.mp4").exists());

    let after = project.store.load();
    assert!(after.get("clip.mp4").is_none());
    assert_eq!(after.get("keep.mp4"), before.get("keep.mp4"));
}
