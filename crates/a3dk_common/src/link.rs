//! How files from a source tree are materialised in an export tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether exported files are copied or symbolically linked.
///
/// Linking keeps the export tree in sync with the user's sources while they
/// iterate; copying produces a self-contained tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Copy every file (default).
    #[default]
    Copy,
    /// Create symbolic links pointing back at the original files.
    Link,
}

impl LinkMode {
    /// Maps the CLI `--link` flag to a mode.
    pub fn from_flag(link: bool) -> Self {
        if link {
            LinkMode::Link
        } else {
            LinkMode::Copy
        }
    }

    /// Returns `true` for [`LinkMode::Link`].
    pub fn is_link(self) -> bool {
        self == LinkMode::Link
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkMode::Copy => write!(f, "copy"),
            LinkMode::Link => write!(f, "link"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flag() {
        assert_eq!(LinkMode::from_flag(false), LinkMode::Copy);
        assert_eq!(LinkMode::from_flag(true), LinkMode::Link);
        assert!(LinkMode::Link.is_link());
        assert!(!LinkMode::default().is_link());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", LinkMode::Copy), "copy");
        assert_eq!(format!("{}", LinkMode::Link), "link");
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&LinkMode::Link).unwrap();
        assert_eq!(json, "\"link\"");
    }
}
