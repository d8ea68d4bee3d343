//! Incremental media build cache and orphan reconciliation.
//!
//! This crate decides which sources need re-transforming and keeps the
//! destination trees consistent with the set of sources that still exist:
//!
//! - [`compute_signature`] derives a stat-based change signature.
//! - [`ManifestStore`] persists the last known signature and output list per source.
//! - [`expected_outputs`] enumerates the files a full transform of a source produces.
//! - [`decide`] applies the skip rule using [`is_fresh`].
//! - [`reconcile`] and [`remove_source`] delete outputs that no longer belong
//!   to an existing source.
//!
//! The manifest is only a cache hint: deleting it is always correct, it just
//! makes the next build transform everything again.

#![warn(missing_docs)]

pub mod discovery;
pub mod error;
pub mod freshness;
pub mod manifest;
pub mod outputs;
pub mod reconcile;
pub mod signature;

pub use discovery::{source_key, SourceFile, SourceTree};
pub use error::CacheError;
pub use freshness::{decide, is_fresh, Decision, StaleReason};
pub use manifest::{LoadStatus, Manifest, ManifestEntry, ManifestStore, MANIFEST_FORMAT_VERSION};
pub use outputs::{expected_outputs, PlannedOutput};
pub use reconcile::{reconcile, remove_source, FileFailure, ReconcileReport, RemovalReport};
pub use signature::compute_signature;
