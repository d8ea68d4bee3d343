//! Shared helpers for CLI commands.
//!
//! Contains project root resolution, configuration loading, status line
//! printing, and diagnostic rendering used by every command.

use std::path::{Path, PathBuf};

use reel_cache::{ManifestStore, SourceTree};
use reel_config::{ProjectConfig, ResolvedVideo, CONFIG_FILE};
use reel_diagnostics::{
    Diagnostic, DiagnosticRenderer, DiagnosticSink, JsonRenderer, Severity, TerminalRenderer,
};

use crate::{GlobalArgs, ReportFormat};

/// A loaded project: its root, parsed config, and resolved video paths.
pub struct Project {
    /// Directory containing `reel.toml`.
    pub dir: PathBuf,
    /// Parsed configuration.
    pub config: ProjectConfig,
    /// Video paths anchored at `dir`.
    pub video: ResolvedVideo,
}

impl Project {
    /// Returns the source tree described by the config.
    pub fn tree(&self) -> SourceTree {
        SourceTree::new(&self.video.source_root, &self.video.source_pattern)
    }

    /// Returns the manifest store described by the config.
    pub fn store(&self) -> ManifestStore {
        ManifestStore::new(&self.video.manifest)
    }

    /// Renders `path` relative to the project root when possible.
    pub fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Walks up from `start` looking for the nearest directory containing `reel.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `reel.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Resolves the project root and loads its configuration.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    let dir = resolve_project_root(global)?;
    let config = reel_config::load_config(&dir)?;
    let video = reel_config::resolve_video(&config, &dir);
    Ok(Project { dir, config, video })
}

/// Prints a right-aligned status line to stderr unless `--quiet` is set.
pub fn status(global: &GlobalArgs, verb: &str, message: impl std::fmt::Display) {
    if !global.quiet {
        eprintln!("{verb:>12} {message}");
    }
}

/// Renders the diagnostics in `sink` to stderr. With `--quiet` only errors
/// are shown. Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs, format: ReportFormat) -> usize {
    let diagnostics: Vec<Diagnostic> = sink
        .diagnostics()
        .into_iter()
        .filter(|d| !global.quiet || d.severity == Severity::Error)
        .collect();

    let renderer: Box<dyn DiagnosticRenderer> = match format {
        ReportFormat::Text => Box::new(TerminalRenderer::new(global.color)),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    for diag in &diagnostics {
        eprintln!("{}", renderer.render(diag).trim_end());
    }
    diagnostics.len()
}
