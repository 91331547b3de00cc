//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Kernel parsing, descriptor checks, and export drivers report user-facing
//! problems as structured [`Diagnostic`] messages. The [`DiagnosticSink`]
//! accumulates them across a whole export, and [`TerminalRenderer`] formats
//! them for the user once the command finishes.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod location;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use location::Location;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
