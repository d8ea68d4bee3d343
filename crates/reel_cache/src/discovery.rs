//! Source discovery over a directory and a glob pattern.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::error::CacheError;

/// Matching rules shared by discovery and membership checks: `*` never
/// crosses a directory separator and dotfiles must be matched literally.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A source file found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute (or project-anchored) path of the file.
    pub path: PathBuf,
    /// Path relative to the source root.
    pub rel: PathBuf,
}

impl SourceFile {
    /// Returns the normalized manifest key for this source.
    pub fn key(&self) -> String {
        source_key(&self.rel)
    }
}

/// Returns the normalized manifest key for a path relative to the source root.
pub fn source_key(rel: &Path) -> String {
    path_key(rel)
}

/// Joins the normal components of a relative path with `/`.
pub(crate) fn path_key(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The set of sources: a root directory plus a glob relative to it.
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
    pattern: String,
}

impl SourceTree {
    /// Creates a source tree. `pattern` is relative to `root` (e.g. `**/*.mp4`).
    pub fn new(root: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pattern: pattern.into(),
        }
    }

    /// Returns the source root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the glob pattern relative to the root.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the source root is an existing directory.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    fn compiled(&self) -> Result<Pattern, CacheError> {
        Pattern::new(&self.pattern).map_err(|e| CacheError::InvalidPattern {
            pattern: self.pattern.clone(),
            reason: e.msg.to_string(),
        })
    }

    /// Enumerates every file under the root matching the pattern, sorted by path.
    ///
    /// Fails if the root is missing or any part of the tree cannot be read,
    /// so that callers never mistake an unreadable directory for deleted sources.
    pub fn discover(&self) -> Result<Vec<SourceFile>, CacheError> {
        if !self.exists() {
            return Err(CacheError::SourceRootMissing {
                path: self.root.clone(),
            });
        }
        let pattern = self.compiled()?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| CacheError::Walk {
                path: self.root.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if pattern.matches_with(&path_key(rel), MATCH_OPTIONS) {
                files.push(SourceFile {
                    path: entry.path().to_path_buf(),
                    rel: rel.to_path_buf(),
                });
            }
        }
        files.sort_by(|a, b| a.rel.cmp(&b.rel));
        Ok(files)
    }

    /// Returns `true` if `rel` names an existing file that the pattern selects.
    pub fn contains(&self, rel: &Path) -> bool {
        let Ok(pattern) = self.compiled() else {
            return false;
        };
        pattern.matches_with(&path_key(rel), MATCH_OPTIONS) && self.root.join(rel).is_file()
    }

    /// Converts a user-supplied path into one relative to the source root.
    ///
    /// Accepts paths already relative to the root, or paths that start with
    /// the root (absolute or project-relative). Returns `None` for paths
    /// outside the root or containing `..`.
    pub fn relativize(&self, path: &Path) -> Option<PathBuf> {
        let rel = match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) if path.is_relative() => path.to_path_buf(),
            Err(_) => return None,
        };
        let normal = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        (normal && !rel.as_os_str().is_empty()).then_some(rel)
    }
}
