//! `reel init`: project scaffolding command.
//!
//! Creates a `reel.toml` with the default video pipeline settings written
//! out, plus the `src/assets/video/` source directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use reel_common::TransformSettings;
use reel_config::CONFIG_FILE;

/// Runs the `reel init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
/// Returns exit code 0 on success.
pub fn run(name: Option<String>) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        return Err(format!("{CONFIG_FILE} already exists in {}", project_dir.display()).into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("site");

    eprintln!("    Creating new Reel project `{project_name}`");

    create_directories(&project_dir)?;
    write_reel_toml(&project_dir, project_name)?;

    eprintln!("     Created {}", project_dir.join(CONFIG_FILE).display());
    eprintln!(
        "     Created {}",
        project_dir.join("src/assets/video").display()
    );

    Ok(0)
}

/// Creates the source directory for videos.
fn create_directories(root: &Path) -> io::Result<()> {
    fs::create_dir_all(root.join("src").join("assets").join("video"))
}

/// Writes `reel.toml` with every default spelled out.
fn write_reel_toml(root: &Path, name: &str) -> io::Result<()> {
    let s = TransformSettings::default();
    let quoted = |args: &[String]| {
        args.iter()
            .map(|a| format!("\"{a}\""))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let primary_preset = s
        .primary
        .preset
        .as_deref()
        .map(|p| format!("preset = \"{p}\"\n"))
        .unwrap_or_default();

    let name = toml::Value::String(name.to_string());
    let content = format!(
        r#"[project]
name = {name}
version = "0.1.0"

[video]
source = "src/assets/video/**/*.mp4"
dist = "dist/assets/video"
build = "build/assets/video"
mirror = true
manifest = ".reel/video-manifest.json"
# ffmpeg = "node_modules/ffmpeg-static/ffmpeg"

[video.primary]
extension = "{p_ext}"
codec = "{p_codec}"
crf = {p_crf}
{primary_preset}args = [{p_args}]

[video.secondary]
extension = "{s_ext}"
codec = "{s_codec}"
crf = {s_crf}
args = [{s_args}]

[video.poster]
extension = "{poster_ext}"
quality = {poster_quality}

[video.scaled]
enabled = {scaled_enabled}
percent = {percent}
primary_crf = {scaled_p_crf}
secondary_crf = {scaled_s_crf}

[clean]
dirs = ["dist", "build"]
"#,
        p_ext = s.primary.extension,
        p_codec = s.primary.codec,
        p_crf = s.primary.crf,
        p_args = quoted(&s.primary.args),
        s_ext = s.secondary.extension,
        s_codec = s.secondary.codec,
        s_crf = s.secondary.crf,
        s_args = quoted(&s.secondary.args),
        poster_ext = s.poster.extension,
        poster_quality = s.poster.quality,
        scaled_enabled = s.scaled.enabled,
        percent = s.scaled.percent,
        scaled_p_crf = s.scaled.primary_crf,
        scaled_s_crf = s.scaled.secondary_crf,
    );

    fs::write(root.join(CONFIG_FILE), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_directory_structure() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("landing");
        run(Some(project_dir.to_str().unwrap().to_string())).unwrap();

        assert!(project_dir.join(CONFIG_FILE).is_file());
        assert!(project_dir.join("src/assets/video").is_dir());
    }

    #[test]
    fn init_generates_valid_toml_matching_defaults() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("toml_proj");
        run(Some(project_dir.to_str().unwrap().to_string())).unwrap();

        let toml_str = fs::read_to_string(project_dir.join(CONFIG_FILE)).unwrap();
        let config = reel_config::load_config_from_str(&toml_str);
        assert!(
            config.is_ok(),
            "generated reel.toml should be valid: {config:?}"
        );
        let config = config.unwrap();
        assert_eq!(config.project.name, "toml_proj");
        assert_eq!(config.video.settings, TransformSettings::default());
        assert!(config.video.ffmpeg.is_none());
    }

    #[test]
    fn init_quotes_unusual_directory_names() {
        let tmp = TempDir::new().unwrap();
        let name = r#"say "hi" \ there"#;
        write_reel_toml(tmp.path(), name).unwrap();
        let text = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        let config = reel_config::load_config_from_str(&text).unwrap();
        assert_eq!(config.project.name, name);
    }

    #[test]
    fn init_existing_dir_error() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("exists");
        fs::create_dir_all(&project_dir).unwrap();
        assert!(run(Some(project_dir.to_str().unwrap().to_string())).is_err());
    }

    #[test]
    fn init_in_current_dir_layout() {
        let tmp = TempDir::new().unwrap();
        create_directories(tmp.path()).unwrap();
        write_reel_toml(tmp.path(), "here").unwrap();
        assert!(tmp.path().join("src/assets/video").is_dir());
        let text = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(text.contains("name = \"here\""));
        assert!(text.contains("\"+faststart\""));
    }
}
