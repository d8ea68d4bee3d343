//! Parsing and validation of `reel.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`]. [`resolve_video`] anchors the configured video paths at
//! the project root and resolves the ffmpeg binary to run.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_video, ResolvedVideo};
pub use types::*;
