//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::resolve::split_glob;
use crate::types::ProjectConfig;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "reel.toml";

/// Loads and validates a `reel.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Parses and validates a `reel.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }

    let video = &config.video;
    let (source_base, pattern) = split_glob(&video.source);
    let file_pattern = pattern.rsplit('/').next().unwrap_or_default();
    if file_pattern.is_empty() || file_pattern == "**" {
        return Err(ConfigError::ValidationError(format!(
            "video.source '{}' must end in a file pattern such as '*.mp4'",
            video.source
        )));
    }
    glob::Pattern::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: video.source.clone(),
        reason: e.msg.to_string(),
    })?;
    let source_root =
        project_relative(&source_base).ok_or_else(|| ConfigError::OutsideProject {
            field: "video.source",
            path: video.source.clone(),
        })?;

    if video.dist.is_empty() {
        return Err(ConfigError::MissingField("video.dist".to_string()));
    }
    if video.mirror && video.build.is_empty() {
        return Err(ConfigError::MissingField("video.build".to_string()));
    }
    let mut destinations = vec![("video.dist", &video.dist)];
    if video.mirror {
        destinations.push(("video.build", &video.build));
    }
    let mut roots = Vec::new();
    for (field, value) in destinations {
        let root = project_relative(value)
            .filter(|p| p.components().next().is_some())
            .ok_or_else(|| ConfigError::OutsideProject {
                field,
                path: value.clone(),
            })?;
        if overlaps(&root, &source_root) {
            return Err(ConfigError::OverlapsSource {
                field,
                path: value.clone(),
                source_root: source_base.clone(),
            });
        }
        roots.push(root);
    }
    if let [dist, build] = roots.as_slice() {
        if overlaps(dist, build) {
            return Err(ConfigError::ValidationError(
                "video.build must not overlap video.dist".to_string(),
            ));
        }
    }

    let settings = &video.settings;
    if !(1..=99).contains(&settings.scaled.percent) {
        return Err(ConfigError::ValidationError(format!(
            "video.scaled.percent must be between 1 and 99, got {}",
            settings.scaled.percent
        )));
    }

    let extensions = [
        ("video.primary.extension", &settings.primary.extension),
        ("video.secondary.extension", &settings.secondary.extension),
        ("video.poster.extension", &settings.poster.extension),
    ];
    let mut seen = HashSet::new();
    for (field, ext) in extensions {
        if ext.is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
        if ext.starts_with('.') {
            return Err(ConfigError::ValidationError(format!(
                "{field} must not start with '.', got '{ext}'"
            )));
        }
        if !seen.insert(ext.to_ascii_lowercase()) {
            return Err(ConfigError::ValidationError(format!(
                "{field} '{ext}' collides with another output extension"
            )));
        }
    }
    Ok(())
}

/// Returns the normal components of a project-relative path, or `None` if
/// the path is absolute or climbs out with `..`. An empty result names the
/// project root.
fn project_relative(path: &str) -> Option<PathBuf> {
    let mut rel = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(rel)
}

/// Returns `true` if either directory equals or contains the other.
fn overlaps(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}
