//! Output set resolution.
//!
//! [`expected_outputs`] is the single definition of "what a full transform of
//! this source produces". The executor, the freshness check, the reconciler,
//! and source removal all call it, so their views never diverge.

use std::path::{Path, PathBuf};

use reel_common::{OutputKind, TransformSettings};

use crate::discovery::path_key;

/// One output file a source is expected to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    /// Which output this is.
    pub kind: OutputKind,
    /// Path relative to the destination root, mirroring the source's
    /// subdirectory relative to the source root.
    pub rel_path: PathBuf,
}

impl PlannedOutput {
    /// Resolves this output under a destination root.
    pub fn under(&self, dest_root: &Path) -> PathBuf {
        dest_root.join(&self.rel_path)
    }

    /// Returns the normalized `/`-separated relative path stored in the manifest.
    pub fn key(&self) -> String {
        path_key(&self.rel_path)
    }
}

/// Enumerates the outputs of `source_rel` under `settings`, in production order.
///
/// For a source `dir/clip.mp4` this yields `dir/clip.<primary>`,
/// `dir/clip.<secondary>`, `dir/clip.<poster>`, and, only when scaling is
/// enabled, `dir/clip-<percent>.<primary>` and `dir/clip-<percent>.<secondary>`.
/// Only the last extension of the source name is stripped.
pub fn expected_outputs(source_rel: &Path, settings: &TransformSettings) -> Vec<PlannedOutput> {
    let stem = source_rel
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = source_rel.parent().unwrap_or_else(|| Path::new(""));

    settings
        .output_kinds()
        .into_iter()
        .map(|kind| {
            let ext = settings.extension(kind);
            let name = if kind.is_scaled() {
                format!("{stem}-{}.{ext}", settings.scaled.percent)
            } else {
                format!("{stem}.{ext}")
            };
            PlannedOutput {
                kind,
                rel_path: parent.join(name),
            }
        })
        .collect()
}
