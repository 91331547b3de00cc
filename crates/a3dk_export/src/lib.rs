//! Hardware export drivers.
//!
//! [`Exporter`] turns a loaded [`Project`](a3dk_config::Project) into an
//! export tree: per-kernel IP cores under `pcores/`, the reference design
//! rendered around them, and the vendor scripts run against the result.
//! Rendering and external tools are reached through the
//! [`TemplateRenderer`](a3dk_template::TemplateRenderer) and [`ToolRunner`]
//! traits, so the drivers can run against fakes.

#![warn(missing_docs)]

pub mod error;
pub mod exporter;
pub mod stage;
pub mod tool;

pub use error::ExportError;
pub use exporter::{Exporter, ProjectExport};
pub use stage::KernelStage;
pub use tool::{ProcessRunner, ToolCommand, ToolError, ToolRunner};
