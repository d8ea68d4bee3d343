//! Persisted manifest mapping each source to its signature and outputs.
//!
//! The manifest is a single JSON document rewritten as a whole on every save.
//! Saves go through a temporary file in the same directory followed by a
//! rename, so the next load sees either the previous snapshot or the new one,
//! never a partial write.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use reel_common::Signature;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Current manifest format version. A manifest with any other version is
/// discarded on load.
pub const MANIFEST_FORMAT_VERSION: u32 = 1;

/// Cached state for a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Signature of the source and settings at the last transform attempt.
    pub signature: Signature,

    /// Expected outputs at the last transform attempt, relative to the
    /// destination root, with `/` separators, in production order.
    pub outputs: Vec<String>,
}

impl ManifestEntry {
    /// Resolves the recorded outputs under `dest_root`.
    pub fn output_paths(&self, dest_root: &Path) -> Vec<PathBuf> {
        self.outputs.iter().map(|rel| dest_root.join(rel)).collect()
    }
}

/// The full manifest: normalized source key to [`ManifestEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Format version of this document.
    pub format_version: u32,

    /// Per-source entries keyed by path relative to the source root.
    pub entries: BTreeMap<String, ManifestEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    /// Creates a new, empty manifest at the current format version.
    pub fn new() -> Self {
        Self {
            format_version: MANIFEST_FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Returns the entry for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ManifestEntry> {
        self.entries.get(key)
    }

    /// Inserts or overwrites the entry for `key`, leaving all other entries untouched.
    pub fn insert(&mut self, key: impl Into<String>, entry: ManifestEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Removes the entry for `key`. No-op if absent.
    pub fn remove(&mut self, key: &str) -> Option<ManifestEntry> {
        self.entries.remove(key)
    }

    /// Keeps only the entries whose key satisfies `keep`, returning the removed keys.
    pub fn retain_keys(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|key, _| {
            let kept = keep(key);
            if !kept {
                removed.push(key.clone());
            }
            kept
        });
        removed
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How a manifest load went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The manifest was read and parsed.
    Loaded,
    /// No manifest file existed yet.
    Missing,
    /// A manifest existed but was unreadable, malformed, or from another
    /// format version; an empty manifest was used instead.
    Reset,
}

/// Loads and atomically saves the manifest at a fixed path.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    /// Creates a store for the manifest file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the manifest file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the manifest, returning an empty one if the file is missing or
    /// malformed. Never fails.
    pub fn load(&self) -> Manifest {
        self.load_with_status().0
    }

    /// Loads the manifest and reports whether it was found, missing, or reset.
    pub fn load_with_status(&self) -> (Manifest, LoadStatus) {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return (Manifest::new(), LoadStatus::Missing)
            }
            Err(_) => return (Manifest::new(), LoadStatus::Reset),
        };
        match serde_json::from_str::<Manifest>(&content) {
            Ok(m) if m.format_version == MANIFEST_FORMAT_VERSION => (m, LoadStatus::Loaded),
            _ => (Manifest::new(), LoadStatus::Reset),
        }
    }

    /// Saves the full manifest, replacing the previous snapshot atomically.
    ///
    /// Creates the housing directory if it doesn't exist.
    pub fn save(&self, manifest: &Manifest) -> Result<(), CacheError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let json =
            serde_json::to_string_pretty(manifest).map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| CacheError::Io {
                path: tmp.path().to_path_buf(),
                source: e,
            })?;
        tmp.persist(&self.path).map_err(|e| CacheError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}
