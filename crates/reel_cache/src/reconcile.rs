//! Orphan reconciliation and single-source removal.
//!
//! Incremental builds only ever add or overwrite outputs, so outputs of
//! deleted or renamed sources pile up. [`reconcile`] restores the invariant
//! from scratch: after it runs, every file under each destination root is an
//! expected output of a source that exists, and every manifest key names an
//! existing source. [`remove_source`] does the same for one source, for use
//! by external watchers.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use reel_common::TransformSettings;
use walkdir::WalkDir;

use crate::discovery::{path_key, source_key, SourceTree};
use crate::error::CacheError;
use crate::manifest::ManifestStore;
use crate::outputs::expected_outputs;

/// A file that could not be deleted or visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// The affected path.
    pub path: PathBuf,
    /// Human-readable failure description.
    pub reason: String,
}

/// Result of a full reconciliation.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Number of sources that currently exist.
    pub sources: usize,
    /// Orphaned files that were deleted, across all destination roots.
    pub removed: Vec<PathBuf>,
    /// Files that should have been deleted but could not be, and directories
    /// that could not be walked.
    pub failed: Vec<FileFailure>,
    /// Manifest keys dropped because their source no longer exists.
    pub pruned_entries: Vec<String>,
    /// Set when the filtered manifest could not be saved.
    pub manifest_error: Option<CacheError>,
}

/// Result of removing the outputs of one deleted source.
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// `true` when the source still exists; nothing was touched.
    pub source_present: bool,
    /// Output files that were deleted.
    pub removed: Vec<PathBuf>,
    /// Output files that could not be deleted.
    pub failed: Vec<FileFailure>,
    /// `true` if a manifest entry existed and was removed.
    pub entry_removed: bool,
    /// Set when the updated manifest could not be saved.
    pub manifest_error: Option<CacheError>,
}

/// Deletes every file under `dest_roots` that is not an expected output of a
/// currently existing source, then drops manifest entries for missing sources.
///
/// Fails without deleting anything if the sources cannot be enumerated, since
/// an unreadable source tree would otherwise look like every source was
/// deleted. The manifest file itself is never treated as an orphan.
pub fn reconcile(
    tree: &SourceTree,
    dest_roots: &[&Path],
    settings: &TransformSettings,
    store: &ManifestStore,
) -> Result<ReconcileReport, CacheError> {
    let sources = tree.discover()?;

    let expected: HashSet<String> = sources
        .iter()
        .flat_map(|source| expected_outputs(&source.rel, settings))
        .map(|output| output.key())
        .collect();

    let mut report = ReconcileReport {
        sources: sources.len(),
        ..ReconcileReport::default()
    };

    for root in dest_roots {
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.failed.push(FileFailure {
                        path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.path() == store.path() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            if expected.contains(&path_key(rel)) {
                continue;
            }
            match std::fs::remove_file(entry.path()) {
                Ok(()) => report.removed.push(entry.path().to_path_buf()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => report.failed.push(FileFailure {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                }),
            }
        }
    }

    let live: HashSet<String> = sources.iter().map(|s| s.key()).collect();
    let mut manifest = store.load();
    report.pruned_entries = manifest.retain_keys(|key| live.contains(key));
    report.manifest_error = store.save(&manifest).err();

    Ok(report)
}

/// Handles the deletion of a single source at `rel` (relative to the source root).
///
/// If the source file still exists this is a no-op. Otherwise every output it
/// is expected to have under the current settings, plus every output its
/// manifest entry recorded, is deleted from each destination root and the
/// entry is removed. Other entries are left untouched.
pub fn remove_source(
    tree: &SourceTree,
    rel: &Path,
    dest_roots: &[&Path],
    settings: &TransformSettings,
    store: &ManifestStore,
) -> RemovalReport {
    let mut report = RemovalReport::default();
    if tree.root().join(rel).is_file() {
        report.source_present = true;
        return report;
    }

    let key = source_key(rel);
    let mut manifest = store.load();

    let mut outputs: Vec<String> = expected_outputs(rel, settings)
        .iter()
        .map(|o| o.key())
        .collect();
    if let Some(entry) = manifest.get(&key) {
        for recorded in &entry.outputs {
            if !outputs.contains(recorded) {
                outputs.push(recorded.clone());
            }
        }
    }

    for root in dest_roots {
        for output in &outputs {
            let path = root.join(output);
            match std::fs::remove_file(&path) {
                Ok(()) => report.removed.push(path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => report.failed.push(FileFailure {
                    path,
                    reason: e.to_string(),
                }),
            }
        }
    }

    if manifest.remove(&key).is_some() {
        report.entry_removed = true;
        report.manifest_error = store.save(&manifest).err();
    }
    report
}
