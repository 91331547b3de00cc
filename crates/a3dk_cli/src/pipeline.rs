//! Shared plumbing for CLI commands.

use std::path::PathBuf;

use a3dk_config::{find_project_root, CONFIG_FILE};
use a3dk_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};

use crate::GlobalArgs;

/// Resolves the configuration file to load, honoring `--config` when given.
///
/// `--config` may name a configuration file of any name or a directory holding
/// `artico3.toml`. Without it the nearest enclosing project is used.
pub fn resolve_config_file(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p)
        } else {
            Ok(p.join(CONFIG_FILE))
        }
    } else {
        Ok(find_project_root(&std::env::current_dir()?)?.join(CONFIG_FILE))
    }
}

/// Prints collected diagnostics and a summary line to stderr.
///
/// With `--quiet` only errors are printed.
pub fn report(sink: &DiagnosticSink, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        if global.quiet && !diag.severity.is_error() {
            continue;
        }
        eprint!("{}", renderer.render(&diag));
    }
    if !global.quiet {
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            sink.error_count(),
            sink.warning_count()
        );
    }
}
