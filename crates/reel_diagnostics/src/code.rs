//! Diagnostic codes with category prefixes.
//!
//! The codes emitted by the pipeline are defined here so that every crate
//! refers to the same catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
    /// Notes, prefixed with `N`.
    Note,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Note => 'N',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a number.
///
/// Displayed as the prefix followed by a zero-padded 3-digit number, e.g.
/// `W003` or `E101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// The configured source directory does not exist.
    pub const SOURCE_DIR_MISSING: Self = Self::new(Category::Warning, 1);
    /// The source glob matched no files.
    pub const NO_SOURCES: Self = Self::new(Category::Warning, 2);
    /// The ffmpeg binary could not be run.
    pub const TOOL_UNAVAILABLE: Self = Self::new(Category::Warning, 3);
    /// The manifest could not be persisted.
    pub const MANIFEST_SAVE_FAILED: Self = Self::new(Category::Warning, 4);
    /// A file could not be deleted.
    pub const DELETE_FAILED: Self = Self::new(Category::Warning, 5);
    /// A file could not be copied into the build mirror.
    pub const MIRROR_FAILED: Self = Self::new(Category::Warning, 6);
    /// One output of a source failed to transform.
    pub const OUTPUT_FAILED: Self = Self::new(Category::Error, 101);
    /// The manifest on disk was unreadable and was reset.
    pub const MANIFEST_RESET: Self = Self::new(Category::Note, 1);
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Note.prefix(), 'N');
    }

    #[test]
    fn display_format() {
        assert_eq!(DiagnosticCode::OUTPUT_FAILED.to_string(), "E101");
        assert_eq!(DiagnosticCode::TOOL_UNAVAILABLE.to_string(), "W003");
        assert_eq!(DiagnosticCode::MANIFEST_RESET.to_string(), "N001");
    }

    #[test]
    fn catalogue_codes_are_distinct() {
        let codes = [
            DiagnosticCode::SOURCE_DIR_MISSING,
            DiagnosticCode::NO_SOURCES,
            DiagnosticCode::TOOL_UNAVAILABLE,
            DiagnosticCode::MANIFEST_SAVE_FAILED,
            DiagnosticCode::DELETE_FAILED,
            DiagnosticCode::MIRROR_FAILED,
            DiagnosticCode::OUTPUT_FAILED,
            DiagnosticCode::MANIFEST_RESET,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
