//! Progress of a single kernel export.

use std::fmt;

/// Where a kernel export currently stands.
///
/// Structural kernels go `NotStarted → Validated → DirectExport → Exported`.
/// HLS kernels go through the temporary workspace instead:
/// `Validated → TempWorkspaceCreated → ExternalSynthesisInvoked →
/// ResultsCollected → Exported`. Any step may end in `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelStage {
    /// Nothing done yet.
    NotStarted,
    /// Tool checked and kernel found.
    Validated,
    /// HLS build scripts rendered into a fresh workspace.
    TempWorkspaceCreated,
    /// The synthesis tool is running.
    ExternalSynthesisInvoked,
    /// Synthesized HDL located in the workspace.
    ResultsCollected,
    /// Structural sources rendered straight into the export tree.
    DirectExport,
    /// The IP core is complete.
    Exported,
    /// The export was abandoned.
    Failed,
}

impl fmt::Display for KernelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KernelStage::NotStarted => "not started",
            KernelStage::Validated => "validated",
            KernelStage::TempWorkspaceCreated => "workspace created",
            KernelStage::ExternalSynthesisInvoked => "synthesizing",
            KernelStage::ResultsCollected => "results collected",
            KernelStage::DirectExport => "exporting",
            KernelStage::Exported => "exported",
            KernelStage::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
