//! Configuration types deserialized from `reel.toml`.

use reel_common::TransformSettings;
use serde::Deserialize;

/// The top-level project configuration parsed from `reel.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Video stage configuration.
    #[serde(default)]
    pub video: VideoConfig,
    /// Directories removed by `reel clean`.
    #[serde(default)]
    pub clean: CleanConfig,
}

/// Core project metadata required in every `reel.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
}

/// Video stage configuration.
///
/// All paths are relative to the project root. The encoder tables
/// (`[video.primary]`, `[video.secondary]`, `[video.poster]`,
/// `[video.scaled]`) are flattened into [`TransformSettings`].
#[derive(Debug, Deserialize)]
pub struct VideoConfig {
    /// Glob selecting source videos. The source root is the part before `**`.
    #[serde(default = "default_source")]
    pub source: String,
    /// Destination root for transcoded outputs.
    #[serde(default = "default_dist")]
    pub dist: String,
    /// Build mirror root that receives a copy of every dist output.
    #[serde(default = "default_build")]
    pub build: String,
    /// Whether the build mirror is maintained.
    #[serde(default = "default_true")]
    pub mirror: bool,
    /// Location of the persisted manifest.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Explicit ffmpeg binary. Defaults to `ffmpeg` on `PATH`.
    #[serde(default)]
    pub ffmpeg: Option<String>,
    /// Encoder settings that shape every output.
    #[serde(flatten)]
    pub settings: TransformSettings,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            dist: default_dist(),
            build: default_build(),
            mirror: true,
            manifest: default_manifest(),
            ffmpeg: None,
            settings: TransformSettings::default(),
        }
    }
}

/// Directories removed by `reel clean`.
#[derive(Debug, Deserialize)]
pub struct CleanConfig {
    /// Directories to remove, relative to the project root.
    #[serde(default = "default_clean_dirs")]
    pub dirs: Vec<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            dirs: default_clean_dirs(),
        }
    }
}

fn default_source() -> String {
    "src/assets/video/**/*.mp4".to_string()
}

fn default_dist() -> String {
    "dist/assets/video".to_string()
}

fn default_build() -> String {
    "build/assets/video".to_string()
}

fn default_manifest() -> String {
    ".reel/video-manifest.json".to_string()
}

fn default_clean_dirs() -> Vec<String> {
    vec!["dist".to_string(), "build".to_string()]
}

fn default_true() -> bool {
    true
}
