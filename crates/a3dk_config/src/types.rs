//! Configuration types deserialized from `artico3.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;

/// The top-level project configuration parsed from `artico3.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Target platform and vendor tool selection.
    #[serde(rename = "impl")]
    pub implementation: ImplConfig,
    /// Data shuffler (slot interconnect) settings.
    #[serde(default)]
    pub shuffler: ShufflerConfig,
    /// Kernels declared in the project, in declaration order.
    #[serde(default)]
    pub kernels: Vec<KernelConfig>,
    /// Reconfigurable slots and the kernels mapped into them.
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

impl ProjectConfig {
    /// Returns the kernel named exactly `name`.
    ///
    /// Validation guarantees names are unique, so there is at most one.
    pub fn kernel(&self, name: &str) -> Option<&KernelConfig> {
        self.kernels.iter().find(|k| k.name == name)
    }

    /// Returns the kernels assigned to `slot`, in the slot's listed order.
    ///
    /// Names that match no declared kernel are skipped; validation rejects
    /// them before this is ever reached.
    pub fn slot_kernels<'a>(
        &'a self,
        slot: &'a SlotConfig,
    ) -> impl Iterator<Item = &'a KernelConfig> {
        slot.kernels
            .iter()
            .filter_map(move |name| self.kernels.iter().find(|k| &k.name == name))
    }
}

/// Core project metadata required in every `artico3.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
}

/// Platform, board, and vendor tool selection.
#[derive(Debug, Deserialize)]
pub struct ImplConfig {
    /// Root of the ARTICo³ installation holding the `templates/` directory.
    pub repo: PathBuf,
    /// FPGA part number (e.g. `xc7z020clg400-1`).
    pub part: String,
    /// Board identifier tokens (e.g. `["zybo"]` or `["zcu102", "revb"]`).
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(deserialize_with = "deserialize_string_or_vec")]
    pub board: Vec<String>,
    /// Reference design name.
    pub design: String,
    /// Target operating system (e.g. `linux`).
    pub os: String,
    /// Vendor tool family (only `vivado` is supported).
    pub tool: String,
    /// Vendor tool release (e.g. `2022.2`).
    pub tool_version: String,
    /// Installation root of the vendor tools.
    #[serde(default = "default_xilinx_root")]
    pub xilinx_root: PathBuf,
}

fn default_xilinx_root() -> PathBuf {
    PathBuf::from("/tools/Xilinx")
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Data shuffler configuration.
#[derive(Debug, Deserialize)]
pub struct ShufflerConfig {
    /// Number of reconfigurable slots.
    #[serde(default = "default_slots")]
    pub slots: u32,
    /// Pipeline depth of the shuffler.
    #[serde(default)]
    pub stages: u32,
    /// Clock buffer type, or `none`.
    #[serde(default = "no_buffer")]
    pub clkbuf: String,
    /// Reset buffer type, or `none`.
    #[serde(default = "no_buffer")]
    pub rstbuf: String,
}

fn default_slots() -> u32 {
    1
}

fn no_buffer() -> String {
    "none".to_string()
}

impl Default for ShufflerConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            stages: 0,
            clkbuf: no_buffer(),
            rstbuf: no_buffer(),
        }
    }
}

/// A hardware kernel declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct KernelConfig {
    /// Kernel name, unique within the project.
    pub name: String,
    /// How the kernel hardware is described.
    pub hwsrc: HwSource,
    /// Total local memory of the kernel, in bytes.
    #[serde(default)]
    pub membytes: u64,
    /// Number of memory banks (memory ports).
    #[serde(default)]
    pub membanks: u32,
    /// Number of configuration registers.
    #[serde(default)]
    pub regs: u32,
    /// Reset polarity of the kernel.
    #[serde(default)]
    pub rstpol: ResetPolarity,
}

/// Kernel source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HwSource {
    /// Structural VHDL.
    Vhdl,
    /// Structural Verilog.
    Verilog,
    /// C/C++ compiled by the high-level synthesis tool.
    Hls,
}

impl HwSource {
    /// Returns `true` for kernels authored directly in an HDL.
    pub fn is_structural(self) -> bool {
        matches!(self, HwSource::Vhdl | HwSource::Verilog)
    }

    /// The tag used for source directories and template variables.
    pub fn as_str(self) -> &'static str {
        match self {
            HwSource::Vhdl => "vhdl",
            HwSource::Verilog => "verilog",
            HwSource::Hls => "hls",
        }
    }
}

impl fmt::Display for HwSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active level of the kernel reset signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetPolarity {
    /// Active-high reset (default).
    #[default]
    High,
    /// Active-low reset.
    Low,
}

impl fmt::Display for ResetPolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetPolarity::High => f.write_str("high"),
            ResetPolarity::Low => f.write_str("low"),
        }
    }
}

/// A reconfigurable slot.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotConfig {
    /// Slot index, `0..shuffler.slots`.
    pub id: u32,
    /// Names of the kernels that may be loaded into this slot.
    #[serde(default)]
    pub kernels: Vec<String>,
}
