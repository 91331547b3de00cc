//! Accelerator core identity: the IP name and version a kernel is packaged as.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version string every generated kernel core is stamped with.
pub const DEFAULT_CORE_VERSION: &str = "1.00.a";

/// Prefix shared by all kernel cores and kernel source directories.
pub const CORE_PREFIX: &str = "a3_";

/// The packaged identity of a kernel core.
///
/// The name is always lowercase and carries the `a3_` prefix, so a kernel
/// declared as `MatMul` becomes the core `a3_matmul` version `1.00.a`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CoreId {
    /// Core name, e.g. `a3_matmul`.
    pub name: String,
    /// Dotted core version, e.g. `1.00.a`.
    pub version: String,
}

impl CoreId {
    /// Derives the core identity for a kernel name.
    pub fn for_kernel(kernel_name: &str) -> Self {
        Self {
            name: format!("{CORE_PREFIX}{}", kernel_name.to_lowercase()),
            version: DEFAULT_CORE_VERSION.to_string(),
        }
    }

    /// Returns the pcore directory name, e.g. `a3_matmul_v1_00_a`.
    pub fn pcore_dir(&self) -> String {
        format!("{}_v{}", self.name, self.version.replace('.', "_"))
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}
