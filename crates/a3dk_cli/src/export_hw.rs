//! `a3dk export_hw`: kernel and project hardware export.

use a3dk_common::LinkMode;
use a3dk_config::Project;
use a3dk_diagnostics::DiagnosticSink;
use a3dk_export::{Exporter, ProcessRunner, ToolRunner};
use a3dk_template::{DirectoryRenderer, TemplateRenderer};

use crate::pipeline::{report, resolve_config_file};
use crate::{ExportHwArgs, GlobalArgs};

/// Runs the `a3dk export_hw` command with the real renderer and tools.
///
/// Returns exit code 0 on success, 1 if any error was reported.
pub fn run(args: &ExportHwArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    run_with(args, global, &DirectoryRenderer, &ProcessRunner)
}

fn run_with(
    args: &ExportHwArgs,
    global: &GlobalArgs,
    renderer: &dyn TemplateRenderer,
    runner: &dyn ToolRunner,
) -> Result<i32, Box<dyn std::error::Error>> {
    let project = Project::load_file(&resolve_config_file(global)?)?;
    let sink = DiagnosticSink::new();
    let exporter = Exporter::new(&project, renderer, runner, &sink).with_progress(!global.quiet);
    let mode = LinkMode::from_flag(args.link);
    let hwdir = args.hwdir.as_deref();

    if !global.quiet {
        eprintln!("   Exporting {} ({mode})", project.config.project.name);
    }

    let result = match &args.kernel {
        Some(kernel) => exporter.export_kernel(kernel, hwdir, mode),
        None => exporter.export_project(hwdir, mode).map(|export| {
            if !export.failed_kernels.is_empty() {
                tracing::warn!("skipped kernels: {}", export.failed_kernels.join(", "));
            }
            export.hwdir
        }),
    };

    match result {
        Ok(dir) => tracing::info!("export written to {}", dir.display()),
        Err(e) => {
            tracing::error!("{e}");
            sink.emit(e.to_diagnostic());
        }
    }

    report(&sink, global);
    Ok(if sink.has_errors() { 1 } else { 0 })
}
