//! Stat-based change signatures.
//!
//! A signature covers the source's size, its modification time, and the
//! serialized transform settings. File contents are never read, so an edit
//! that preserves both size and modification time goes unnoticed.

use reel_common::{Signature, SourceStat, TransformSettings};

/// Computes the change signature for a source stat under the given settings.
///
/// Pure and deterministic: equal inputs always produce equal signatures.
pub fn compute_signature(stat: &SourceStat, settings: &TransformSettings) -> Signature {
    let modified = stat.modified_since_epoch();
    let serialized = settings.serialized();

    let mut buf = Vec::with_capacity(28 + serialized.len());
    buf.extend_from_slice(&stat.size.to_le_bytes());
    buf.extend_from_slice(&modified.as_secs().to_le_bytes());
    buf.extend_from_slice(&modified.subsec_nanos().to_le_bytes());
    buf.extend_from_slice(serialized.as_bytes());
    Signature::from_bytes(&buf)
}
