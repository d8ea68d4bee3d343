//! Codec parameters for each output kind.

use reel_common::{EncodeProfile, OutputKind, TransformSettings};

/// Output-side arguments for one transform call, excluding the input and
/// output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecParams {
    /// Arguments placed between the input and the output path.
    pub args: Vec<String>,
}

impl CodecParams {
    /// Returns the arguments as string slices.
    pub fn as_args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str)
    }
}

/// Returns the ffmpeg scale filter that resizes to `percent` of the input,
/// rounding each dimension down to an even number.
pub fn scale_filter(percent: u8) -> String {
    format!("scale=trunc(iw*{percent}/100/2)*2:trunc(ih*{percent}/100/2)*2")
}

/// Derives the codec parameters for `kind` under `settings`.
pub fn codec_params(kind: OutputKind, settings: &TransformSettings) -> CodecParams {
    let args = match kind {
        OutputKind::Primary => video_args(&settings.primary, settings.primary.crf, None),
        OutputKind::Secondary => video_args(&settings.secondary, settings.secondary.crf, None),
        OutputKind::ScaledPrimary => video_args(
            &settings.primary,
            settings.scaled.primary_crf,
            Some(scale_filter(settings.scaled.percent)),
        ),
        OutputKind::ScaledSecondary => video_args(
            &settings.secondary,
            settings.scaled.secondary_crf,
            Some(scale_filter(settings.scaled.percent)),
        ),
        OutputKind::Poster => vec![
            "-frames:v".to_string(),
            "1".to_string(),
            "-qscale:v".to_string(),
            settings.poster.quality.to_string(),
        ],
    };
    CodecParams { args }
}

fn video_args(profile: &EncodeProfile, crf: u8, filter: Option<String>) -> Vec<String> {
    let mut args = Vec::new();
    if !profile.keep_audio {
        args.push("-an".to_string());
    }
    args.push("-c:v".to_string());
    args.push(profile.codec.clone());
    if let Some(filter) = filter {
        args.push("-vf".to_string());
        args.push(filter);
    }
    args.push("-crf".to_string());
    args.push(crf.to_string());
    if let Some(preset) = &profile.preset {
        args.push("-preset".to_string());
        args.push(preset.clone());
    }
    args.extend(profile.args.iter().cloned());
    args
}
