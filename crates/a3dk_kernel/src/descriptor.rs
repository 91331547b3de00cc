//! Descriptors handed to the template renderer.
//!
//! Each template family gets its own typed record. Field names serialize to
//! the template variable names (`NAME`, `REGS`, `SlotCoreName`, ...), so the
//! renderer's key-value form is produced only at the rendering boundary.

use crate::interface::KernelInterface;
use a3dk_common::CoreId;
use a3dk_config::{KernelConfig, ProjectConfig};
use serde::Serialize;
use std::path::Path;

/// Template variables for one kernel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct KernelDescriptor {
    /// Kernel name, lowercased.
    pub name: String,
    /// Source kind tag (`vhdl`, `verilog`, `hls`).
    pub hwsrc: String,
    /// Target FPGA part.
    pub part: String,
    /// Reset polarity (`high` or `low`).
    pub rst_pol: String,
    /// Declared local memory size in bytes.
    pub membytes: u64,
    /// Source directories to pull into the generated core.
    pub sources: Vec<String>,
    /// HDL files under the source directory, extensions stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<FileEntry>>,
    /// HLS source files, extensions kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileEntry>>,
    /// Registers in index order.
    pub regs: Vec<RegisterEntry>,
    /// Memory banks in index order.
    pub ports: Vec<PortEntry>,
    /// Number of registers.
    pub numregs: usize,
    /// Number of memory banks.
    pub membanks: usize,
    /// 32-bit words per memory bank (HLS kernels only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mempos: Option<u64>,
    /// Kernel arguments with role tags removed (HLS kernels only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

/// A file entry in `INCLUDES` or `FILES`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path relative to the source directory.
    #[serde(rename = "File")]
    pub file: String,
}

/// A register entry in `REGS`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterEntry {
    /// Register name, known only for HLS kernels.
    #[serde(rename = "rname", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Register index.
    #[serde(rename = "rid")]
    pub index: usize,
}

/// A memory bank entry in `PORTS`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PortEntry {
    /// Port name, known only for HLS kernels.
    #[serde(rename = "pname", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Bank index.
    #[serde(rename = "pid")]
    pub index: usize,
}

impl KernelDescriptor {
    fn base(kernel: &KernelConfig, part: &str, src_dir: &Path) -> Self {
        Self {
            name: kernel.name.to_lowercase(),
            hwsrc: kernel.hwsrc.to_string(),
            part: part.to_string(),
            rst_pol: kernel.rstpol.to_string(),
            membytes: kernel.membytes,
            sources: vec![path_string(src_dir)],
            includes: None,
            files: None,
            regs: Vec::new(),
            ports: Vec::new(),
            numregs: 0,
            membanks: 0,
            mempos: None,
            args: None,
        }
    }

    /// Descriptor for a kernel authored in VHDL or Verilog.
    ///
    /// With no port declaration to parse, registers and banks are numbered
    /// from the declared counts.
    pub fn structural(kernel: &KernelConfig, part: &str, src_dir: &Path, files: &[String]) -> Self {
        let regs = (0..kernel.regs as usize)
            .map(|index| RegisterEntry { name: None, index })
            .collect::<Vec<_>>();
        let ports = (0..kernel.membanks as usize)
            .map(|index| PortEntry { name: None, index })
            .collect::<Vec<_>>();
        Self {
            includes: Some(include_entries(files)),
            numregs: regs.len(),
            membanks: ports.len(),
            regs,
            ports,
            ..Self::base(kernel, part, src_dir)
        }
    }

    /// Descriptor for an HLS kernel, built from its parsed interface.
    ///
    /// Counts come from the parsed ports; `mempos` from declared values.
    pub fn hls(
        kernel: &KernelConfig,
        part: &str,
        src_dir: &Path,
        files: &[String],
        interface: &KernelInterface,
    ) -> Self {
        let regs = interface
            .ports
            .registers
            .iter()
            .map(|p| RegisterEntry {
                name: Some(p.name.clone()),
                index: p.index,
            })
            .collect::<Vec<_>>();
        let ports = interface
            .ports
            .memory
            .iter()
            .map(|p| PortEntry {
                name: Some(p.name.clone()),
                index: p.index,
            })
            .collect::<Vec<_>>();
        Self {
            files: Some(
                files
                    .iter()
                    .map(|f| FileEntry { file: f.clone() })
                    .collect(),
            ),
            numregs: regs.len(),
            membanks: ports.len(),
            regs,
            ports,
            mempos: Some(interface.mem_positions),
            args: Some(interface.declaration.args()),
            ..Self::base(kernel, part, src_dir)
        }
    }

    /// Points the descriptor at HDL produced by high-level synthesis.
    pub fn with_synthesized_sources(mut self, src_dir: &Path, files: &[String]) -> Self {
        self.sources = vec![path_string(src_dir)];
        self.includes = Some(include_entries(files));
        self
    }
}

fn include_entries(files: &[String]) -> Vec<FileEntry> {
    files
        .iter()
        .map(|f| FileEntry { file: trim_ext(f) })
        .collect()
}

/// Strips the extension from the last component of a relative path.
pub fn trim_ext(path: &str) -> String {
    path_string(&Path::new(path).with_extension(""))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Sentinel for a shuffler without a clock or reset buffer.
pub const NO_BUFFER: &str = "NO_BUFFER";

/// Template variables for the whole-project reference design.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ProjectDescriptor {
    /// Number of reconfigurable slots.
    pub num_slots: u32,
    /// Shuffler pipeline depth.
    pub pipe_depth: u32,
    /// Clock buffer type or [`NO_BUFFER`].
    pub clk_buffer: String,
    /// Reset buffer type or [`NO_BUFFER`].
    pub rst_buffer: String,
    /// Slots that have at least one kernel assigned.
    pub slots: Vec<SlotEntry>,
    /// Every kernel core in the project.
    pub kernels: Vec<CoreEntry>,
}

/// A populated slot in `SLOTS`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotEntry {
    /// Core name of the first kernel assigned to the slot.
    #[serde(rename = "SlotCoreName")]
    pub core_name: String,
    /// Core version of that kernel.
    #[serde(rename = "SlotCoreVersion")]
    pub core_version: String,
    /// Slot index.
    pub id: u32,
}

/// A kernel core in `KERNELS`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CoreEntry {
    /// Kernel core name.
    #[serde(rename = "KernCoreName")]
    pub core_name: String,
    /// Kernel core version.
    #[serde(rename = "KernCoreVersion")]
    pub core_version: String,
}

impl ProjectDescriptor {
    /// Builds the project descriptor from the configuration.
    pub fn from_config(config: &ProjectConfig) -> Self {
        let slots = config
            .slots
            .iter()
            .filter_map(|slot| {
                let first = config.slot_kernels(slot).next()?;
                let core = CoreId::for_kernel(&first.name);
                Some(SlotEntry {
                    core_name: core.name,
                    core_version: core.version,
                    id: slot.id,
                })
            })
            .collect();
        let kernels = config
            .kernels
            .iter()
            .map(|k| {
                let core = CoreId::for_kernel(&k.name);
                CoreEntry {
                    core_name: core.name,
                    core_version: core.version,
                }
            })
            .collect();
        Self {
            num_slots: config.shuffler.slots,
            pipe_depth: config.shuffler.stages,
            clk_buffer: buffer_tag(&config.shuffler.clkbuf),
            rst_buffer: buffer_tag(&config.shuffler.rstbuf),
            slots,
            kernels,
        }
    }
}

/// Maps a configured buffer type to its template value.
pub fn buffer_tag(kind: &str) -> String {
    if kind == "none" {
        NO_BUFFER.to_string()
    } else {
        kind.to_uppercase()
    }
}
