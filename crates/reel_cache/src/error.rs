//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// Most cache reads are fail-safe: problems result in cache misses rather
/// than errors. This enum covers the operations that genuinely cannot
/// proceed, such as persisting the manifest or enumerating sources.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The source root does not exist, so sources cannot be enumerated.
    #[error("source directory {path} does not exist")]
    SourceRootMissing {
        /// The missing directory.
        path: PathBuf,
    },

    /// The source glob pattern is malformed.
    #[error("invalid source pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Description of the problem.
        reason: String,
    },

    /// Walking a directory tree failed part-way.
    #[error("failed to walk {path}: {reason}")]
    Walk {
        /// The directory being walked.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },
}
