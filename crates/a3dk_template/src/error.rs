//! Error types for template rendering.

use std::path::PathBuf;

/// Errors raised while rendering a template set.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template set directory does not exist.
    #[error("template directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A descriptor could not be turned into a dictionary.
    #[error("descriptor is not a key-value record: {0}")]
    Descriptor(String),

    /// A template referenced a key the dictionary does not define.
    #[error("{}: unknown template key `{key}`", .path.display())]
    UnknownKey {
        /// Template file containing the reference.
        path: PathBuf,
        /// The undefined key.
        key: String,
    },

    /// A `generate` block is malformed.
    #[error("{}: {message}", .path.display())]
    Syntax {
        /// Template file containing the block.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

impl TemplateError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TemplateError::Io {
            path: path.into(),
            source,
        }
    }
}
