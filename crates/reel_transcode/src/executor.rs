//! Per-source transcode executor.

use std::path::{Path, PathBuf};

use reel_cache::{expected_outputs, Manifest, ManifestEntry, SourceFile};
use reel_common::{OutputKind, Signature, TransformSettings};
use serde::Serialize;

use crate::params::codec_params;
use crate::transform::Transform;

/// Result of one output of one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum OutputStatus {
    /// The output was written.
    Ok,
    /// The output could not be produced.
    Failed(String),
}

/// One attempted output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputResult {
    /// Which output this is.
    pub kind: OutputKind,
    /// Absolute output path.
    pub path: PathBuf,
    /// What happened.
    #[serde(flatten)]
    pub status: OutputStatus,
}

/// Every output attempted for one source, in production order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOutcome {
    /// Manifest key of the source.
    pub source: String,
    /// Per-output results.
    pub outputs: Vec<OutputResult>,
}

impl SourceOutcome {
    /// Number of failed outputs.
    pub fn failed_count(&self) -> usize {
        self.outputs
            .iter()
            .filter(|o| matches!(o.status, OutputStatus::Failed(_)))
            .count()
    }

    /// Number of outputs written.
    pub fn ok_count(&self) -> usize {
        self.outputs.len() - self.failed_count()
    }

    /// Returns `true` if every output was written.
    pub fn all_ok(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Transforms `source` into its full output set under `dest_root`.
///
/// Each output is attempted in order regardless of earlier failures. Once
/// all have been attempted, the manifest entry for the source is replaced
/// with `signature` and the complete expected output list, including
/// outputs that failed; the freshness check finds those missing next run.
pub fn process(
    transform: &mut dyn Transform,
    source: &SourceFile,
    dest_root: &Path,
    settings: &TransformSettings,
    signature: Signature,
    manifest: &mut Manifest,
) -> SourceOutcome {
    let planned = expected_outputs(&source.rel, settings);
    let mut outputs = Vec::with_capacity(planned.len());

    for output in &planned {
        let path = output.under(dest_root);
        let status = match attempt(transform, &source.path, &path, output.kind, settings) {
            Ok(()) => OutputStatus::Ok,
            Err(reason) => OutputStatus::Failed(reason),
        };
        outputs.push(OutputResult {
            kind: output.kind,
            path,
            status,
        });
    }

    manifest.insert(
        source.key(),
        ManifestEntry {
            signature,
            outputs: planned.iter().map(|o| o.key()).collect(),
        },
    );

    SourceOutcome {
        source: source.key(),
        outputs,
    }
}

fn attempt(
    transform: &mut dyn Transform,
    input: &Path,
    output: &Path,
    kind: OutputKind,
    settings: &TransformSettings,
) -> Result<(), String> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("cannot create {}: {e}", parent.display()))?;
    }
    transform
        .transform(input, output, &codec_params(kind, settings))
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::params::CodecParams;

    /// Writes a stub file for each call, failing on outputs with a chosen extension.
    struct Stub {
        fail_ext: Option<&'static str>,
        calls: Vec<PathBuf>,
    }

    impl Transform for Stub {
        fn transform(
            &mut self,
            _input: &Path,
            output: &Path,
            _params: &CodecParams,
        ) -> Result<(), TransformError> {
            self.calls.push(output.to_path_buf());
            let ext = output.extension().and_then(|e| e.to_str());
            if ext.is_some() && ext == self.fail_ext {
                return Err(TransformError::Failed {
                    program: PathBuf::from("stub"),
                    status: "exit status: 1".to_string(),
                    stderr: "encoder missing".to_string(),
                });
            }
            std::fs::write(output, b"out").map_err(|e| TransformError::Io {
                path: output.to_path_buf(),
                source: e,
            })
        }
    }

    fn source(root: &Path, rel: &str) -> SourceFile {
        SourceFile {
            path: root.join(rel),
            rel: PathBuf::from(rel),
        }
    }

    #[test]
    fn all_outputs_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let dist = dir.path().join("dist");
        let mut stub = Stub {
            fail_ext: None,
            calls: Vec::new(),
        };
        let mut manifest = Manifest::new();
        let sig = Signature::from_bytes(b"sig");

        let outcome = process(
            &mut stub,
            &source(dir.path(), "hero/loop.mp4"),
            &dist,
            &TransformSettings::default(),
            sig,
            &mut manifest,
        );

        assert!(outcome.all_ok());
        assert_eq!(outcome.ok_count(), 5);
        assert_eq!(stub.calls[0], dist.join("hero/loop.mp4"));
        assert_eq!(stub.calls[2], dist.join("hero/loop.jpg"));
        assert_eq!(stub.calls[4], dist.join("hero/loop-75.webm"));
        assert!(dist.join("hero/loop-75.mp4").exists());
        assert_eq!(manifest.get("hero/loop.mp4").unwrap().signature, sig);
    }

    #[test]
    fn failure_does_not_stop_siblings_and_full_list_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let dist = dir.path().join("dist");
        let mut stub = Stub {
            fail_ext: Some("webm"),
            calls: Vec::new(),
        };
        let mut manifest = Manifest::new();

        let outcome = process(
            &mut stub,
            &source(dir.path(), "clip.mp4"),
            &dist,
            &TransformSettings::default(),
            Signature::from_bytes(b"sig"),
            &mut manifest,
        );

        assert_eq!(stub.calls.len(), 5);
        assert_eq!(outcome.failed_count(), 2);
        assert_eq!(outcome.ok_count(), 3);
        assert!(matches!(
            &outcome.outputs[1].status,
            OutputStatus::Failed(reason) if reason.contains("encoder missing")
        ));
        assert_eq!(
            manifest.get("clip.mp4").unwrap().outputs,
            vec![
                "clip.mp4",
                "clip.webm",
                "clip.jpg",
                "clip-75.mp4",
                "clip-75.webm"
            ]
        );
    }
}
