//! Reel CLI: incremental video builds for static sites.
//!
//! Provides `reel init` for scaffolding, `reel build` for the incremental
//! transcode with orphan cleanup and mirroring, `reel status` for a dry run,
//! and maintenance commands (`reconcile`, `forget`, `mirror`, `prune`, `clean`).

#![warn(missing_docs)]

mod build;
mod forget;
mod init;
mod maintain;
mod pipeline;
mod reconcile;
mod status;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Reel: incremental video transcoding with a self-healing output tree.
#[derive(Parser, Debug)]
#[command(name = "reel", version, about = "Reel video build pipeline")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print per-output progress and notes.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `reel.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Reel project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,
    },
    /// Transcode changed sources, remove orphans, and refresh the build mirror.
    Build(BuildArgs),
    /// Show which sources a build would transcode, and why.
    Status(StatusArgs),
    /// Delete outputs that no longer belong to any source.
    Reconcile,
    /// Remove the outputs and manifest entry of one deleted source.
    Forget {
        /// Source path, relative to the source directory or including it.
        source: String,
    },
    /// Copy dist outputs into the build mirror.
    Mirror,
    /// Remove empty directories under the dist and build roots.
    Prune,
    /// Remove the directories listed under `[clean]`.
    Clean,
}

/// Arguments for the `reel build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Skip orphan reconciliation before transcoding.
    #[arg(long)]
    pub no_reconcile: bool,

    /// Skip copying outputs into the build mirror.
    #[arg(long)]
    pub no_mirror: bool,

    /// Output format for the summary and diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `reel status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format for the plan.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Init { name } => init::run(name),
        Command::Build(ref args) => build::run(args, &global),
        Command::Status(ref args) => status::run(args, &global),
        Command::Reconcile => reconcile::run(&global),
        Command::Forget { ref source } => forget::run(source, &global),
        Command::Mirror => maintain::mirror(&global),
        Command::Prune => maintain::prune(&global),
        Command::Clean => maintain::clean(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_init_default() {
        let cli = Cli::parse_from(["reel", "init"]);
        match cli.command {
            Command::Init { name } => assert!(name.is_none()),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_name() {
        let cli = Cli::parse_from(["reel", "init", "landing"]);
        match cli.command {
            Command::Init { name } => assert_eq!(name.as_deref(), Some("landing")),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["reel", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(!args.no_reconcile);
                assert!(!args.no_mirror);
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_flags() {
        let cli = Cli::parse_from([
            "reel",
            "build",
            "--no-reconcile",
            "--no-mirror",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.no_reconcile);
                assert!(args.no_mirror);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_status_json() {
        let cli = Cli::parse_from(["reel", "status", "-f", "json"]);
        match cli.command {
            Command::Status(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn parse_forget_source() {
        let cli = Cli::parse_from(["reel", "forget", "hero/loop.mp4"]);
        match cli.command {
            Command::Forget { ref source } => assert_eq!(source, "hero/loop.mp4"),
            _ => panic!("expected Forget command"),
        }
    }

    #[test]
    fn parse_forget_requires_source() {
        assert!(Cli::try_parse_from(["reel", "forget"]).is_err());
    }

    #[test]
    fn parse_maintenance_commands() {
        assert!(matches!(
            Cli::parse_from(["reel", "reconcile"]).command,
            Command::Reconcile
        ));
        assert!(matches!(
            Cli::parse_from(["reel", "mirror"]).command,
            Command::Mirror
        ));
        assert!(matches!(
            Cli::parse_from(["reel", "prune"]).command,
            Command::Prune
        ));
        assert!(matches!(
            Cli::parse_from(["reel", "clean"]).command,
            Command::Clean
        ));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["reel", "--quiet", "--color", "never", "build"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["reel", "status", "--verbose", "--color", "always"]);
        assert!(cli.verbose);
        assert_eq!(cli.color, ColorChoice::Always);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["reel", "--config", "/site/reel.toml", "build"]);
        assert_eq!(cli.config.as_deref(), Some("/site/reel.toml"));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["reel", "watch"]).is_err());
    }
}
