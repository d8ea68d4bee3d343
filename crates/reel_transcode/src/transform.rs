//! The external transform seam.
//!
//! [`Transform`] is the only way the pipeline produces an output file. The
//! real implementation shells out to ffmpeg; tests substitute a recorder.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::TransformError;
use crate::params::CodecParams;

/// Number of trailing stderr lines kept in a failure message.
const STDERR_TAIL_LINES: usize = 5;

/// Produces one output file from one input file.
pub trait Transform {
    /// Checks that the transform can run at all. Called once per batch
    /// before any source is processed.
    fn available(&mut self) -> Result<(), TransformError> {
        Ok(())
    }

    /// Writes `output` from `input` using `params`, overwriting any existing file.
    fn transform(
        &mut self,
        input: &Path,
        output: &Path,
        params: &CodecParams,
    ) -> Result<(), TransformError>;
}

/// Runs the ffmpeg binary, one blocking process per output.
#[derive(Debug, Clone)]
pub struct FfmpegTransform {
    program: PathBuf,
}

impl FfmpegTransform {
    /// Creates a transform that invokes `program` (a bare name is looked up on `PATH`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `ffmpeg -version` and returns the first line of its output.
    pub fn probe(&self) -> Result<String, TransformError> {
        let out = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| TransformError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;
        if !out.status.success() {
            return Err(TransformError::Failed {
                program: self.program.clone(),
                status: out.status.to_string(),
                stderr: stderr_tail(&out.stderr),
            });
        }
        let stdout = String::from_utf8_lossy(&out.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}

impl Transform for FfmpegTransform {
    fn available(&mut self) -> Result<(), TransformError> {
        self.probe().map(|_| ())
    }

    fn transform(
        &mut self,
        input: &Path,
        output: &Path,
        params: &CodecParams,
    ) -> Result<(), TransformError> {
        let out = Command::new(&self.program)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(input)
            .args(params.as_args())
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| TransformError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;
        if out.status.success() {
            Ok(())
        } else {
            Err(TransformError::Failed {
                program: self.program.clone(),
                status: out.status.to_string(),
                stderr: stderr_tail(&out.stderr),
            })
        }
    }
}

/// Keeps the last few non-empty lines of a process's stderr, joined with `; `.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("; ")
}
