//! Per-kernel and whole-project export drivers.

use crate::error::ExportError;
use crate::stage::KernelStage;
use crate::tool::{ToolCommand, ToolRunner};
use a3dk_common::{CoreId, LinkMode};
use a3dk_config::{KernelConfig, Project};
use a3dk_diagnostics::{DiagnosticSink, Location};
use a3dk_kernel::{compile_interface, KernelDescriptor, ProjectDescriptor};
use a3dk_template::fsutil::{copy_tree, list_files, remove_tree};
use a3dk_template::{Dictionary, TemplateRenderer};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Template set for a structural IP core.
pub const HDL_PCORE_TEMPLATE: &str = "artico3_kernel_hdl_pcore";
/// Template set for the HLS synthesis workspace.
pub const HLS_BUILD_TEMPLATE: &str = "artico3_kernel_hls_build";

const SUPPORTED_TOOL: &str = "vivado";
const PCORES_DIR: &str = "pcores";
const HLS_DIR: &str = "hls";
const HLS_OUTPUT: [&str; 4] = ["a3_kernel", "sol", "syn", "vhdl"];
const SYSTEM_PROJECT_NAME: &str = "myARTICo3";

/// Outcome of a whole-project export.
#[derive(Debug)]
pub struct ProjectExport {
    /// The export tree that was written.
    pub hwdir: PathBuf,
    /// Kernels that were reported and skipped.
    pub failed_kernels: Vec<String>,
}

/// Drives exports for one project.
///
/// Non-fatal findings (consistency warnings, kernels skipped during a
/// project export) go to the diagnostic sink; fatal ones are returned.
pub struct Exporter<'a> {
    project: &'a Project,
    renderer: &'a dyn TemplateRenderer,
    runner: &'a dyn ToolRunner,
    sink: &'a DiagnosticSink,
    progress: bool,
}

impl<'a> Exporter<'a> {
    /// Creates an exporter with progress lines enabled.
    pub fn new(
        project: &'a Project,
        renderer: &'a dyn TemplateRenderer,
        runner: &'a dyn ToolRunner,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            project,
            renderer,
            runner,
            sink,
            progress: true,
        }
    }

    /// Enables or disables the `[A3DK]` progress lines on stderr.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Exports a single kernel as an IP core.
    ///
    /// Writes into `hwdir`, or `<root>/build.hw.<kernel>` when `None`, and
    /// returns the directory written. Nothing is written when the kernel
    /// does not exist.
    pub fn export_kernel(
        &self,
        name: &str,
        hwdir: Option<&Path>,
        mode: LinkMode,
    ) -> Result<PathBuf, ExportError> {
        let hwdir = hwdir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.project.default_kernel_hwdir(name));
        tracing::info!("exporting kernel {name} to {}", hwdir.display());

        let result = self.run_kernel(name, &hwdir, mode);
        match &result {
            Ok(()) => stage(name, KernelStage::Exported),
            Err(e) => {
                stage(name, KernelStage::Failed);
                tracing::debug!(kernel = name, error = %e, "kernel export failed");
            }
        }
        result.map(|()| hwdir)
    }

    fn run_kernel(&self, name: &str, hwdir: &Path, mode: LinkMode) -> Result<(), ExportError> {
        stage(name, KernelStage::NotStarted);
        self.check_tool()?;
        let kernel = self.lookup(name)?;
        stage(name, KernelStage::Validated);

        if kernel.hwsrc.is_structural() {
            self.export_structural(kernel, hwdir, mode)
        } else {
            self.export_hls(kernel, hwdir, mode)
        }
    }

    fn lookup(&self, name: &str) -> Result<&'a KernelConfig, ExportError> {
        self.project
            .config
            .kernel(name)
            .ok_or_else(|| ExportError::KernelNotFound(name.to_string()))
    }

    fn check_tool(&self) -> Result<(), ExportError> {
        let tool = &self.project.config.implementation.tool;
        if tool == SUPPORTED_TOOL {
            Ok(())
        } else {
            Err(ExportError::UnsupportedTool(tool.clone()))
        }
    }

    fn export_structural(
        &self,
        kernel: &KernelConfig,
        hwdir: &Path,
        mode: LinkMode,
    ) -> Result<(), ExportError> {
        stage(&kernel.name, KernelStage::DirectExport);
        let src = self.project.kernel_src_dir(kernel);
        let files = list_files(&src).map_err(|e| ExportError::io(&src, e))?;
        let descriptor = KernelDescriptor::structural(kernel, self.part(), &src, &files);

        tracing::info!("generating export files ...");
        self.render_kernel(kernel, HDL_PCORE_TEMPLATE, &descriptor, hwdir, mode)
    }

    fn export_hls(
        &self,
        kernel: &KernelConfig,
        hwdir: &Path,
        mode: LinkMode,
    ) -> Result<(), ExportError> {
        let src = self.project.kernel_src_dir(kernel);
        let files = list_files(&src).map_err(|e| ExportError::io(&src, e))?;
        let source_path = src.join(format!("{}.cpp", kernel.name.to_lowercase()));
        let source =
            fs::read_to_string(&source_path).map_err(|e| ExportError::io(&source_path, e))?;

        let interface = compile_interface(kernel, &source).map_err(|e| {
            let location = e.offset().map(|offset| {
                let (line, column) = Location::line_col(&source, offset);
                Location::new(&source_path, line, column)
            });
            ExportError::Parse {
                kernel: kernel.name.clone(),
                location,
                source: e,
            }
        })?;
        self.sink.extend(interface.warnings.iter().cloned());
        let descriptor = KernelDescriptor::hls(kernel, self.part(), &src, &files, &interface);

        // Removed on drop, whichever way this function returns.
        let workspace = tempfile::Builder::new()
            .prefix("a3dk-hls-")
            .tempdir()
            .map_err(|e| ExportError::io(std::env::temp_dir(), e))?;
        tracing::info!(
            "generating temporary HLS project in {} ...",
            workspace.path().display()
        );
        self.render_kernel(
            kernel,
            HLS_BUILD_TEMPLATE,
            &descriptor,
            workspace.path(),
            LinkMode::Copy,
        )?;
        stage(&kernel.name, KernelStage::TempWorkspaceCreated);

        tracing::info!("starting Vitis HLS ...");
        stage(&kernel.name, KernelStage::ExternalSynthesisInvoked);
        self.run_tool("high-level synthesis", ToolCommand::hls_synthesis(workspace.path()))?;

        let output = HLS_OUTPUT
            .iter()
            .fold(workspace.path().to_path_buf(), |dir, part| dir.join(part));
        if !output.is_dir() {
            return Err(ExportError::SynthesisOutputMissing(output));
        }
        let generated = list_files(&output).map_err(|e| ExportError::io(&output, e))?;
        let descriptor = descriptor.with_synthesized_sources(&output, &generated);
        stage(&kernel.name, KernelStage::ResultsCollected);

        tracing::info!("generating export files ...");
        // Sources live in the workspace, which is about to disappear.
        self.render_kernel(kernel, HDL_PCORE_TEMPLATE, &descriptor, hwdir, LinkMode::Copy)?;
        if mode.is_link() {
            tracing::debug!(
                kernel = %kernel.name,
                "link mode does not apply to synthesized sources"
            );
        }

        let artifacts = hwdir
            .join(CoreId::for_kernel(&kernel.name).pcore_dir())
            .join(HLS_DIR);
        remove_tree(&artifacts).map_err(|e| ExportError::io(&artifacts, e))?;
        copy_tree(workspace.path(), &artifacts).map_err(|e| ExportError::io(&artifacts, e))?;
        Ok(())
    }

    /// Exports the whole project: reference design, every kernel, then the
    /// Vivado IP repository and block design.
    ///
    /// Writes into `hwdir`, or `<root>/build.hw` when `None`. Kernels that
    /// fail on their own are reported to the sink and listed in the result;
    /// a missing reference template or a failing tool aborts.
    pub fn export_project(
        &self,
        hwdir: Option<&Path>,
        mode: LinkMode,
    ) -> Result<ProjectExport, ExportError> {
        self.check_tool()?;
        let hwdir = hwdir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.project.default_hwdir());
        tracing::info!("exporting hardware to {}", hwdir.display());

        let descriptor = ProjectDescriptor::from_config(&self.project.config);
        let template = self.project.reference_template();
        let template_dir = self.project.template_dir(&template);
        if !template_dir.is_dir() {
            return Err(ExportError::TemplateMissing(template_dir));
        }
        self.progress(&format!("Using template directory {template}"));
        let dict = dictionary(&descriptor, None)?;
        self.renderer
            .render(&template_dir, &dict, &hwdir, mode)
            .map_err(|source| ExportError::Template {
                kernel: None,
                source,
            })?;

        tracing::info!("generating ARTICo³ kernels ...");
        let pcores = hwdir.join(PCORES_DIR);
        let mut failed_kernels = Vec::new();
        for kernel in &self.project.config.kernels {
            match self.export_kernel(&kernel.name, Some(&pcores), mode) {
                Ok(_) => {}
                Err(e) if e.is_kernel_local() => {
                    tracing::error!("{e}");
                    self.sink.emit(e.to_diagnostic());
                    failed_kernels.push(kernel.name.clone());
                }
                Err(e) => return Err(e),
            }
        }

        self.progress("Calling TCL script to generate Vivado IP Repository");
        self.run_tool(
            "Vivado IP repository generation",
            ToolCommand::vivado_batch(&hwdir, "create_ip_library.tcl", &[]),
        )?;

        self.progress("Calling TCL script to generate ARTICo³ system in Vivado IP Integrator");
        self.run_tool(
            "Vivado IP Integrator design generation",
            ToolCommand::vivado_batch(
                &hwdir,
                "export.tcl",
                &["-proj_name", SYSTEM_PROJECT_NAME, "-proj_path", "."],
            ),
        )?;

        Ok(ProjectExport {
            hwdir,
            failed_kernels,
        })
    }

    fn part(&self) -> &str {
        &self.project.config.implementation.part
    }

    fn render_kernel(
        &self,
        kernel: &KernelConfig,
        set: &str,
        descriptor: &KernelDescriptor,
        output: &Path,
        mode: LinkMode,
    ) -> Result<(), ExportError> {
        let dict = dictionary(descriptor, Some(&kernel.name))?;
        self.renderer
            .render(&self.project.template_dir(set), &dict, output, mode)
            .map_err(|source| ExportError::Template {
                kernel: Some(kernel.name.clone()),
                source,
            })
    }

    fn run_tool(&self, step: &'static str, command: ToolCommand) -> Result<(), ExportError> {
        let command = command.env_script(self.project.settings_script());
        self.runner
            .run(&command)
            .map_err(|source| ExportError::Tool { step, source })
    }

    fn progress(&self, message: &str) {
        if self.progress {
            eprintln!("[A3DK] {message}");
        }
    }
}

fn dictionary<T: Serialize>(
    descriptor: &T,
    kernel: Option<&str>,
) -> Result<Dictionary, ExportError> {
    Dictionary::from_descriptor(descriptor).map_err(|source| ExportError::Template {
        kernel: kernel.map(str::to_string),
        source,
    })
}

fn stage(kernel: &str, stage: KernelStage) {
    tracing::debug!(kernel, %stage, "kernel export stage");
}
