//! Transform settings that shape every output of a source.
//!
//! [`TransformSettings`] is an immutable value passed explicitly to every
//! function that depends on it. Its serialized form is part of each source's
//! change signature, so any edit here forces a re-transform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of output produced for a single source, in production order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Full-size output in the primary container/codec.
    Primary,
    /// Full-size output in the secondary container/codec.
    Secondary,
    /// Single-frame poster image taken from the first frame.
    Poster,
    /// Scaled copy in the primary container/codec.
    ScaledPrimary,
    /// Scaled copy in the secondary container/codec.
    ScaledSecondary,
}

impl OutputKind {
    /// Returns `true` for the scaled variants.
    pub fn is_scaled(self) -> bool {
        matches!(self, OutputKind::ScaledPrimary | OutputKind::ScaledSecondary)
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Primary => write!(f, "primary"),
            OutputKind::Secondary => write!(f, "secondary"),
            OutputKind::Poster => write!(f, "poster"),
            OutputKind::ScaledPrimary => write!(f, "scaled-primary"),
            OutputKind::ScaledSecondary => write!(f, "scaled-secondary"),
        }
    }
}

/// Encoder settings for one video output format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeProfile {
    /// Output file extension without the dot (e.g. `"mp4"`).
    pub extension: String,
    /// ffmpeg video codec name (e.g. `"libx264"`).
    pub codec: String,
    /// Constant rate factor.
    pub crf: u8,
    /// Optional encoder preset (e.g. `"medium"`).
    #[serde(default)]
    pub preset: Option<String>,
    /// Extra ffmpeg output arguments appended verbatim.
    #[serde(default)]
    pub args: Vec<String>,
    /// Keep the audio stream. Audio is stripped by default.
    #[serde(default)]
    pub keep_audio: bool,
}

impl EncodeProfile {
    /// Default primary profile: H.264 in MP4, web-optimized.
    pub fn default_primary() -> Self {
        Self {
            extension: "mp4".to_string(),
            codec: "libx264".to_string(),
            crf: 26,
            preset: Some("medium".to_string()),
            args: vec!["-movflags".to_string(), "+faststart".to_string()],
            keep_audio: false,
        }
    }

    /// Default secondary profile: VP9 in WebM, constant quality.
    pub fn default_secondary() -> Self {
        Self {
            extension: "webm".to_string(),
            codec: "libvpx-vp9".to_string(),
            crf: 32,
            preset: None,
            args: vec!["-b:v".to_string(), "0".to_string()],
            keep_audio: false,
        }
    }
}

/// Settings for the single-frame poster image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterProfile {
    /// Output file extension without the dot.
    pub extension: String,
    /// JPEG quality scale passed as `-qscale:v` (2 is near-lossless).
    pub quality: u8,
}

impl Default for PosterProfile {
    fn default() -> Self {
        Self {
            extension: "jpg".to_string(),
            quality: 2,
        }
    }
}

/// Settings for the proportionally resized variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaledVariant {
    /// Whether scaled variants are produced at all.
    pub enabled: bool,
    /// Scale factor in percent; also used as the file name marker (`clip-75.mp4`).
    pub percent: u8,
    /// CRF override for the scaled primary output.
    pub primary_crf: u8,
    /// CRF override for the scaled secondary output.
    pub secondary_crf: u8,
}

impl Default for ScaledVariant {
    fn default() -> Self {
        Self {
            enabled: true,
            percent: 75,
            primary_crf: 27,
            secondary_crf: 33,
        }
    }
}

/// Everything that affects the byte-for-byte shape of a source's outputs.
///
/// Two settings values are equal iff their serialized forms are equal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSettings {
    /// Primary full-size format.
    #[serde(default = "EncodeProfile::default_primary")]
    pub primary: EncodeProfile,
    /// Secondary full-size format.
    #[serde(default = "EncodeProfile::default_secondary")]
    pub secondary: EncodeProfile,
    /// Poster image settings.
    #[serde(default)]
    pub poster: PosterProfile,
    /// Scaled variant settings.
    #[serde(default)]
    pub scaled: ScaledVariant,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            primary: EncodeProfile::default_primary(),
            secondary: EncodeProfile::default_secondary(),
            poster: PosterProfile::default(),
            scaled: ScaledVariant::default(),
        }
    }
}

impl TransformSettings {
    /// Returns the canonical serialized form used for equality and signatures.
    pub fn serialized(&self) -> String {
        // Plain data always serializes; Debug keeps the fallback deterministic.
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    /// Returns the output kinds produced under these settings, in order.
    pub fn output_kinds(&self) -> Vec<OutputKind> {
        let mut kinds = vec![OutputKind::Primary, OutputKind::Secondary, OutputKind::Poster];
        if self.scaled.enabled {
            kinds.push(OutputKind::ScaledPrimary);
            kinds.push(OutputKind::ScaledSecondary);
        }
        kinds
    }

    /// Returns the file extension used for the given output kind.
    pub fn extension(&self, kind: OutputKind) -> &str {
        match kind {
            OutputKind::Primary | OutputKind::ScaledPrimary => &self.primary.extension,
            OutputKind::Secondary | OutputKind::ScaledSecondary => &self.secondary.extension,
            OutputKind::Poster => &self.poster.extension,
        }
    }
}
