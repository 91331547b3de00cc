//! Error types for the export drivers.

use crate::tool::ToolError;
use a3dk_diagnostics::{Diagnostic, DiagnosticCode, Location};
use a3dk_kernel::ParseError;
use a3dk_template::TemplateError;
use std::path::PathBuf;

const TOOL_HINT: &str = "check artico3.toml for unknown components";

/// Errors that abort a kernel or project export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// `impl.tool` names a vendor tool other than Vivado.
    #[error("tool `{0}` is not supported")]
    UnsupportedTool(String),

    /// No kernel in `artico3.toml` has the requested name.
    #[error("kernel `{0}` not found")]
    KernelNotFound(String),

    /// The kernel's `A3_KERNEL` declaration could not be parsed.
    #[error("kernel `{kernel}`: {source}")]
    Parse {
        /// The kernel being exported.
        kernel: String,
        /// Position of the problem in the kernel source.
        location: Option<Location>,
        /// What is wrong with the declaration.
        source: ParseError,
    },

    /// The reference design template set does not exist.
    #[error("template directory not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    /// A template set could not be rendered.
    #[error("{}{source}", kernel_prefix(.kernel))]
    Template {
        /// The kernel being exported, if any.
        kernel: Option<String>,
        /// The rendering failure.
        source: TemplateError,
    },

    /// A vendor tool failed.
    #[error("{step} failed: {source}")]
    Tool {
        /// What the tool was doing.
        step: &'static str,
        /// How it failed.
        source: ToolError,
    },

    /// Synthesis succeeded but left no HDL where expected.
    #[error("synthesis output not found: {}", .0.display())]
    SynthesisOutputMissing(PathBuf),

    /// A filesystem operation failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

fn kernel_prefix(kernel: &Option<String>) -> String {
    kernel
        .as_ref()
        .map(|k| format!("kernel `{k}`: "))
        .unwrap_or_default()
}

impl ExportError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure concerns only the kernel being exported.
    ///
    /// A project export reports these and moves on to the next kernel;
    /// everything else stops it.
    pub fn is_kernel_local(&self) -> bool {
        matches!(
            self,
            ExportError::KernelNotFound(_)
                | ExportError::Parse { .. }
                | ExportError::Template { .. }
                | ExportError::Io { .. }
        )
    }

    /// The diagnostic reported for this error.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ExportError::UnsupportedTool(tool) => {
                Diagnostic::error(DiagnosticCode::UNSUPPORTED_TOOL, self.to_string())
                    .with_note(format!("artico3.toml selects `{tool}`"))
                    .with_help("set `impl.tool = \"vivado\"`")
            }
            ExportError::KernelNotFound(name) => {
                Diagnostic::error(DiagnosticCode::KERNEL_NOT_FOUND, self.to_string())
                    .with_kernel(name.clone())
            }
            ExportError::Parse {
                kernel,
                location,
                source,
            } => {
                let diag = Diagnostic::error(
                    DiagnosticCode::PARSE,
                    format!("invalid A3_KERNEL declaration: {source}"),
                )
                .with_kernel(kernel.clone());
                match location {
                    Some(loc) => diag.with_location(loc.clone()),
                    None => diag,
                }
            }
            ExportError::TemplateMissing(_) => {
                Diagnostic::error(DiagnosticCode::TEMPLATE_MISSING, self.to_string())
                    .with_help("check `impl.repo` and the platform settings in artico3.toml")
            }
            ExportError::Template { kernel, source } => {
                let code = match source {
                    TemplateError::NotFound(_) => DiagnosticCode::TEMPLATE_MISSING,
                    _ => DiagnosticCode::TEMPLATE,
                };
                let diag = Diagnostic::error(code, source.to_string());
                match kernel {
                    Some(k) => diag.with_kernel(k.clone()),
                    None => diag,
                }
            }
            ExportError::Tool { .. } | ExportError::SynthesisOutputMissing(_) => {
                Diagnostic::error(DiagnosticCode::TOOL_FAILED, self.to_string())
                    .with_help(TOOL_HINT)
            }
            ExportError::Io { .. } => Diagnostic::error(DiagnosticCode::IO, self.to_string()),
        }
    }
}
