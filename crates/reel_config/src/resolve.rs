//! Video path resolution: anchoring configured paths at the project root.

use crate::types::ProjectConfig;
use reel_common::TransformSettings;
use std::path::{Path, PathBuf};

/// Default ffmpeg binary, looked up on `PATH`.
const DEFAULT_FFMPEG: &str = "ffmpeg";

/// A fully resolved video stage configuration with absolute paths.
#[derive(Debug, Clone)]
pub struct ResolvedVideo {
    /// Directory under which sources are discovered.
    pub source_root: PathBuf,
    /// Glob pattern relative to `source_root` (e.g. `**/*.mp4`).
    pub source_pattern: String,
    /// Destination root for transcoded outputs.
    pub dist: PathBuf,
    /// Build mirror root, if mirroring is enabled.
    pub build: Option<PathBuf>,
    /// Manifest file location.
    pub manifest: PathBuf,
    /// ffmpeg binary to invoke.
    pub ffmpeg: PathBuf,
    /// Encoder settings.
    pub settings: TransformSettings,
}

impl ResolvedVideo {
    /// Returns the destination roots: dist first, then the build mirror.
    pub fn destination_roots(&self) -> Vec<&Path> {
        let mut roots = vec![self.dist.as_path()];
        if let Some(build) = &self.build {
            roots.push(build.as_path());
        }
        roots
    }
}

/// Resolves the `[video]` section of `config` against `project_dir`.
pub fn resolve_video(config: &ProjectConfig, project_dir: &Path) -> ResolvedVideo {
    let video = &config.video;
    let (base, pattern) = split_glob(&video.source);

    let ffmpeg = match &video.ffmpeg {
        Some(p) if p.contains('/') || p.contains('\\') => project_dir.join(p),
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(DEFAULT_FFMPEG),
    };

    ResolvedVideo {
        source_root: project_dir.join(base),
        source_pattern: pattern,
        dist: project_dir.join(&video.dist),
        build: video.mirror.then(|| project_dir.join(&video.build)),
        manifest: project_dir.join(&video.manifest),
        ffmpeg,
        settings: video.settings.clone(),
    }
}

/// Splits a source glob into its literal base directory and the remaining pattern.
///
/// The base is everything before the first `**`; without `**` it is the
/// glob's parent directory. Trailing separators are trimmed from the base.
pub fn split_glob(glob: &str) -> (String, String) {
    let split_at = match glob.find("**") {
        Some(i) => i,
        None => glob.rfind('/').map_or(0, |i| i + 1),
    };
    let base = glob[..split_at].trim_end_matches(['/', '\\']).to_string();
    let pattern = glob[split_at..].to_string();
    (base, pattern)
}
