//! Freshness check and the combined skip rule.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use reel_common::Signature;

use crate::manifest::ManifestEntry;

/// Returns `true` if every output exists and is at least as new as the source.
///
/// Any missing file, unreadable metadata, or output older than
/// `source_modified` makes the whole set stale. An output removed between
/// this check and its use is picked up on the next run.
pub fn is_fresh(outputs: &[PathBuf], source_modified: SystemTime) -> bool {
    outputs.iter().all(|path| {
        std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .is_ok_and(|modified| modified >= source_modified)
    })
}

/// Why a source has to be transformed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The manifest has no entry for the source.
    NotInManifest,
    /// The source's size, mtime, or the settings changed.
    SignatureChanged,
    /// At least one recorded output is missing or older than the source.
    OutputsStale,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::NotInManifest => write!(f, "not in manifest"),
            StaleReason::SignatureChanged => write!(f, "signature changed"),
            StaleReason::OutputsStale => write!(f, "outputs missing or stale"),
        }
    }
}

/// The outcome of the skip rule for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Entry present, signature unchanged, outputs fresh.
    Skip,
    /// Re-transform the full output set.
    Transcode(StaleReason),
}

impl Decision {
    /// Returns `true` if the source must be transformed.
    pub fn needs_transcode(self) -> bool {
        matches!(self, Decision::Transcode(_))
    }
}

/// Applies the skip rule: skip only when an entry exists, its signature
/// equals `current`, and its recorded outputs under `dest_root` are fresh.
pub fn decide(
    entry: Option<&ManifestEntry>,
    current: Signature,
    dest_root: &Path,
    source_modified: SystemTime,
) -> Decision {
    let Some(entry) = entry else {
        return Decision::Transcode(StaleReason::NotInManifest);
    };
    if entry.signature != current {
        return Decision::Transcode(StaleReason::SignatureChanged);
    }
    if !is_fresh(&entry.output_paths(dest_root), source_modified) {
        return Decision::Transcode(StaleReason::OutputsStale);
    }
    Decision::Skip
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"out").unwrap();
        path
    }

    fn entry(sig: Signature, outputs: &[&str]) -> ManifestEntry {
        ManifestEntry {
            signature: sig,
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn all_present_and_newer_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.mp4");
        let b = write(dir.path(), "a.webm");
        let past = SystemTime::now() - Duration::from_secs(3600);
        assert!(is_fresh(&[a, b], past));
    }

    #[test]
    fn empty_list_is_fresh() {
        assert!(is_fresh(&[], SystemTime::now()));
    }

    #[test]
    fn missing_output_is_not_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.mp4");
        let past = SystemTime::now() - Duration::from_secs(3600);
        assert!(!is_fresh(&[a, dir.path().join("a.webm")], past));
    }

    #[test]
    fn older_output_is_not_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.mp4");
        let future = SystemTime::now() + Duration::from_secs(3600);
        assert!(!is_fresh(&[a], future));
    }

    #[test]
    fn decide_without_entry() {
        let sig = Signature::from_bytes(b"s");
        assert_eq!(
            decide(None, sig, Path::new("/dist"), SystemTime::UNIX_EPOCH),
            Decision::Transcode(StaleReason::NotInManifest)
        );
    }

    #[test]
    fn decide_signature_changed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.mp4");
        let e = entry(Signature::from_bytes(b"old"), &["a.mp4"]);
        let decision = decide(
            Some(&e),
            Signature::from_bytes(b"new"),
            dir.path(),
            SystemTime::UNIX_EPOCH,
        );
        assert_eq!(decision, Decision::Transcode(StaleReason::SignatureChanged));
        assert!(decision.needs_transcode());
    }

    #[test]
    fn decide_outputs_stale() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.mp4");
        let sig = Signature::from_bytes(b"same");
        let e = entry(sig, &["a.mp4", "a.webm"]);
        assert_eq!(
            decide(Some(&e), sig, dir.path(), SystemTime::UNIX_EPOCH),
            Decision::Transcode(StaleReason::OutputsStale)
        );
    }

    #[test]
    fn decide_skip_when_all_hold() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.mp4");
        write(dir.path(), "a.webm");
        let sig = Signature::from_bytes(b"same");
        let e = entry(sig, &["a.mp4", "a.webm"]);
        let decision = decide(Some(&e), sig, dir.path(), SystemTime::UNIX_EPOCH);
        assert_eq!(decision, Decision::Skip);
        assert!(!decision.needs_transcode());
    }

    #[test]
    fn stale_reason_display() {
        assert_eq!(StaleReason::NotInManifest.to_string(), "not in manifest");
        assert_eq!(StaleReason::SignatureChanged.to_string(), "signature changed");
    }
}
