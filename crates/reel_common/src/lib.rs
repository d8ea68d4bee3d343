//! Shared foundational types used across the Reel media pipeline.
//!
//! This crate provides the change-detection [`Signature`], the stat snapshot
//! of a source file ([`SourceStat`]), and the [`TransformSettings`] value that
//! describes how every output of a source is produced.

#![warn(missing_docs)]

pub mod settings;
pub mod signature;
pub mod stat;

pub use settings::{EncodeProfile, OutputKind, PosterProfile, ScaledVariant, TransformSettings};
pub use signature::{ParseSignatureError, Signature};
pub use stat::SourceStat;
