//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g. `E101` or `W102`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Kernel port declaration could not be parsed.
    pub const PARSE: Self = Self::new(Category::Error, 101);
    /// Requested kernel does not exist in the project.
    pub const KERNEL_NOT_FOUND: Self = Self::new(Category::Error, 201);
    /// The configured synthesis tool is not supported.
    pub const UNSUPPORTED_TOOL: Self = Self::new(Category::Error, 202);
    /// The reference design template set is missing.
    pub const TEMPLATE_MISSING: Self = Self::new(Category::Error, 203);
    /// Rendering a template set failed.
    pub const TEMPLATE: Self = Self::new(Category::Error, 204);
    /// An external vendor tool exited unsuccessfully.
    pub const TOOL_FAILED: Self = Self::new(Category::Error, 301);
    /// Generic filesystem failure during export.
    pub const IO: Self = Self::new(Category::Error, 401);
    /// Parsed register count disagrees with the configured `regs`.
    pub const REGS_MISMATCH: Self = Self::new(Category::Warning, 101);
    /// Parsed memory port count disagrees with the configured `membanks`.
    pub const MEMBANKS_MISMATCH: Self = Self::new(Category::Warning, 102);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
