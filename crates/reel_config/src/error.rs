//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `reel.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// `video.source` is not a valid glob.
    #[error("invalid video.source pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The configured glob.
        pattern: String,
        /// Why the glob did not compile.
        reason: String,
    },

    /// A destination directory escapes the project or names the project root.
    #[error("{field} '{path}' must be a relative directory inside the project")]
    OutsideProject {
        /// The offending key.
        field: &'static str,
        /// The configured value.
        path: String,
    },

    /// A destination directory overlaps the source directory.
    #[error("{field} '{path}' overlaps the video source directory '{source_root}'")]
    OverlapsSource {
        /// The offending key.
        field: &'static str,
        /// The configured value.
        path: String,
        /// Base directory of `video.source`.
        source_root: String,
    },
}
