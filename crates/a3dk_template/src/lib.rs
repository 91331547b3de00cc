//! Template rendering boundary.
//!
//! Descriptors are typed records; templates consume a flat [`Dictionary`].
//! This crate owns the translation between the two and the
//! [`TemplateRenderer`] trait the export drivers render through.
//! [`DirectoryRenderer`] mirrors a template directory into an export tree.

#![warn(missing_docs)]

pub mod dictionary;
pub mod error;
pub mod fsutil;
pub mod render;
pub mod text;

pub use dictionary::Dictionary;
pub use error::TemplateError;
pub use render::{DirectoryRenderer, TemplateRenderer, SOURCES_MARKER};
