//! Video transcoding stage: the external transform seam, the per-source
//! executor, the incremental batch driver, and destination tree upkeep.
//!
//! The transform itself is opaque. Everything that decides *whether* to run
//! it lives in `reel_cache`; this crate runs it, aggregates per-output
//! results, and turns reports into diagnostics.

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod executor;
pub mod params;
pub mod report;
pub mod transform;
pub mod tree;

pub use driver::{plan, run_batch, BatchEvent, BatchSummary, PlannedSource};
pub use error::TransformError;
pub use executor::{process, OutputResult, OutputStatus, SourceOutcome};
pub use params::{codec_params, scale_filter, CodecParams};
pub use report::{emit_mirror_report, emit_reconcile_report, emit_removal_report};
pub use transform::{FfmpegTransform, Transform};
pub use tree::{clean_dir, mirror_tree, prune_empty_dirs, MirrorReport};
