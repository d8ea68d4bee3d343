//! Diagnostic creation, severity management, and rendering.
//!
//! Every user-visible problem in the pipeline (a missing source directory, a
//! failed transcode, an undeletable orphan) is a structured [`Diagnostic`].
//! Operations emit them into a thread-safe [`DiagnosticSink`] instead of
//! printing, and the CLI renders them with a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
