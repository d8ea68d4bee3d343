//! Stat snapshots of source files.

use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The size and modification time of a source file at one point in time.
///
/// This is the only input from the file itself that feeds change detection;
/// file contents are never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStat {
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

impl SourceStat {
    /// Creates a stat snapshot from explicit values.
    pub fn new(size: u64, modified: SystemTime) -> Self {
        Self { size, modified }
    }

    /// Builds a snapshot from already-fetched file metadata.
    pub fn from_metadata(meta: &Metadata) -> io::Result<Self> {
        Ok(Self {
            size: meta.len(),
            modified: meta.modified()?,
        })
    }

    /// Reads the current size and modification time of `path`.
    pub fn read(path: &Path) -> io::Result<Self> {
        Self::from_metadata(&std::fs::metadata(path)?)
    }

    /// Modification time as a duration since the Unix epoch.
    ///
    /// Times before the epoch collapse to zero.
    pub fn modified_since_epoch(&self) -> Duration {
        self.modified
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
    }
}
