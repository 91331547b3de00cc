//! A loaded project: configuration plus the directory it lives in.

use crate::error::ConfigError;
use crate::loader::{load_config, load_config_file};
use crate::types::{KernelConfig, ProjectConfig};
use a3dk_common::CoreId;
use std::path::{Path, PathBuf};

/// A project rooted at the directory containing its `artico3.toml`.
///
/// All paths the export drivers read from or write to are derived here, so
/// the layout conventions live in one place.
#[derive(Debug)]
pub struct Project {
    /// Directory containing `artico3.toml`.
    pub root: PathBuf,
    /// The validated configuration.
    pub config: ProjectConfig,
}

impl Project {
    /// Loads the project rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config = load_config(root)?;
        Ok(Self::new(root.to_path_buf(), config))
    }

    /// Loads the project described by the configuration file at `path`.
    ///
    /// The root is the directory holding the file, which may carry any name.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let config = load_config_file(path)?;
        let root = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self::new(root, config))
    }

    /// Wraps an already-parsed configuration.
    pub fn new(root: PathBuf, config: ProjectConfig) -> Self {
        Self { root, config }
    }

    /// Base path that default export directories are derived from.
    pub fn basedir(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Default whole-project export directory, `<root>/build.hw`.
    pub fn default_hwdir(&self) -> PathBuf {
        with_suffix(&self.basedir(), ".hw")
    }

    /// Default single-kernel export directory, `<root>/build.hw.<kernel>`.
    pub fn default_kernel_hwdir(&self, kernel: &str) -> PathBuf {
        with_suffix(&self.basedir(), &format!(".hw.{}", kernel.to_lowercase()))
    }

    /// Directory holding a kernel's sources, `<root>/src/a3_<name>/<hwsrc>`.
    pub fn kernel_src_dir(&self, kernel: &KernelConfig) -> PathBuf {
        self.root
            .join("src")
            .join(CoreId::for_kernel(&kernel.name).name)
            .join(kernel.hwsrc.as_str())
    }

    /// The ARTICo³ installation root, resolved against the project root.
    pub fn repo(&self) -> PathBuf {
        self.root.join(&self.config.implementation.repo)
    }

    /// Directory of the named template set.
    pub fn template_dir(&self, set: &str) -> PathBuf {
        self.repo().join("templates").join(set)
    }

    /// Name of the reference design template set for this platform.
    ///
    /// `ref_<os>_<board…>_<design>_<tool>_<version>`, board tokens joined by `_`.
    pub fn reference_template(&self) -> String {
        let imp = &self.config.implementation;
        format!(
            "ref_{}_{}_{}_{}_{}",
            imp.os,
            imp.board.join("_"),
            imp.design,
            imp.tool,
            imp.tool_version
        )
    }

    /// The vendor environment script sourced before every tool invocation.
    pub fn settings_script(&self) -> PathBuf {
        let imp = &self.config.implementation;
        imp.xilinx_root
            .join("Vivado")
            .join(&imp.tool_version)
            .join("settings64.sh")
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}
