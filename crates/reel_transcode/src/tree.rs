//! Destination tree upkeep: mirroring, pruning, and cleaning.

use std::io;
use std::path::{Path, PathBuf};

use reel_cache::FileFailure;
use walkdir::WalkDir;

use crate::error::TransformError;

/// Result of copying one tree into another.
#[derive(Debug, Default)]
pub struct MirrorReport {
    /// Destination files written.
    pub copied: Vec<PathBuf>,
    /// Files already up to date in the mirror.
    pub unchanged: usize,
    /// Files that could not be copied.
    pub failed: Vec<FileFailure>,
}

/// Copies every file under `from` to the same relative path under `to`.
///
/// A file is copied when it is missing from `to`, differs in size, or is
/// older than its counterpart in `from`. A missing `from` yields an empty
/// report. Nothing is deleted from `to`.
pub fn mirror_tree(from: &Path, to: &Path) -> MirrorReport {
    let mut report = MirrorReport::default();
    if !from.is_dir() {
        return report;
    }

    for entry in WalkDir::new(from) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.failed.push(FileFailure {
                    path: e.path().map_or_else(|| from.to_path_buf(), Path::to_path_buf),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(rel);
        if is_current(entry.path(), &target) {
            report.unchanged += 1;
            continue;
        }
        match copy_file(entry.path(), &target) {
            Ok(()) => report.copied.push(target),
            Err(e) => report.failed.push(FileFailure {
                path: target,
                reason: e.to_string(),
            }),
        }
    }
    report
}

fn is_current(source: &Path, target: &Path) -> bool {
    let (Ok(src), Ok(dst)) = (std::fs::metadata(source), std::fs::metadata(target)) else {
        return false;
    };
    if src.len() != dst.len() {
        return false;
    }
    match (src.modified(), dst.modified()) {
        (Ok(s), Ok(d)) => d >= s,
        _ => false,
    }
}

fn copy_file(source: &Path, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, target).map(|_| ())
}

/// Removes every empty directory below `root`, deepest first. The root
/// itself is never removed. Returns the removed directories.
pub fn prune_empty_dirs(root: &Path) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    if !root.is_dir() {
        return removed;
    }
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let Ok(entry) = entry else {
            continue;
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let empty = std::fs::read_dir(entry.path())
            .map(|mut it| it.next().is_none())
            .unwrap_or(false);
        if empty && std::fs::remove_dir(entry.path()).is_ok() {
            removed.push(entry.path().to_path_buf());
        }
    }
    removed
}

/// Recursively removes `dir`. Returns `Ok(false)` if it did not exist.
pub fn clean_dir(dir: &Path) -> Result<bool, TransformError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(TransformError::Io {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}
