//! Error types for transform invocations and destination tree upkeep.

use std::path::PathBuf;

/// Errors produced while running the external transform or touching
/// destination trees.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The transform program could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that was invoked.
        program: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The transform program ran but reported failure.
    #[error("{program} exited with {status}{}", stderr_suffix(.stderr))]
    Failed {
        /// The program that was invoked.
        program: PathBuf,
        /// Rendered exit status.
        status: String,
        /// Last lines of the program's standard error.
        stderr: String,
    },

    /// A filesystem operation around the transform failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_error_display() {
        let err = TransformError::Spawn {
            program: PathBuf::from("ffmpeg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to run ffmpeg: not found");
    }

    #[test]
    fn failed_error_display_with_stderr() {
        let err = TransformError::Failed {
            program: PathBuf::from("ffmpeg"),
            status: "exit status: 1".to_string(),
            stderr: "Unknown encoder 'libvpx-vp9'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ffmpeg exited with exit status: 1: Unknown encoder 'libvpx-vp9'"
        );
    }

    #[test]
    fn failed_error_display_without_stderr() {
        let err = TransformError::Failed {
            program: PathBuf::from("/opt/ffmpeg"),
            status: "signal: 9".to_string(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "/opt/ffmpeg exited with signal: 9");
    }

    #[test]
    fn io_error_display() {
        let err = TransformError::Io {
            path: PathBuf::from("dist/hero"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("I/O error at dist/hero"));
    }
}
