//! External tool invocation.
//!
//! Every vendor tool call is described by a [`ToolCommand`] and executed by
//! a [`ToolRunner`]. The environment script and working directory apply to
//! the child process only.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One blocking invocation of an external tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    /// Executable name, resolved through `PATH` after the script is sourced.
    pub program: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Directory the tool runs in.
    pub working_dir: PathBuf,
    /// Shell script sourced first to set up the vendor environment.
    pub env_script: Option<PathBuf>,
}

impl ToolCommand {
    /// A command running `program` in `working_dir`.
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            env_script: None,
        }
    }

    /// Appends arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sources `script` before running the tool.
    pub fn env_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.env_script = Some(script.into());
        self
    }

    /// Vitis HLS synthesis of the workspace at `workspace`.
    pub fn hls_synthesis(workspace: &Path) -> Self {
        Self::new("vitis_hls", workspace).args(["-f", "csynth.tcl"])
    }

    /// Vivado batch run of `script` in `hwdir`, with optional script arguments.
    pub fn vivado_batch(hwdir: &Path, script: &str, tclargs: &[&str]) -> Self {
        let cmd = Self::new("vivado", hwdir).args([
            "-mode", "batch", "-notrace", "-nojournal", "-nolog", "-source", script,
        ]);
        if tclargs.is_empty() {
            cmd
        } else {
            cmd.args(["-tclargs"]).args(tclargs.iter().copied())
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Why an external tool did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The process could not be started.
    #[error("could not start `{program}`: {source}")]
    Spawn {
        /// The tool being started.
        program: String,
        /// The underlying error.
        source: io::Error,
    },

    /// The process ran and reported failure.
    #[error("`{program}` exited with {}", exit_text(.code))]
    Exit {
        /// The tool that failed.
        program: String,
        /// Exit status, `None` if killed by a signal.
        code: Option<i32>,
    },
}

fn exit_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Executes [`ToolCommand`]s.
pub trait ToolRunner {
    /// Runs `command` to completion.
    fn run(&self, command: &ToolCommand) -> Result<(), ToolError>;
}

/// Runs tools as child processes.
///
/// With an environment script the child is
/// `bash -c 'source "$0" && exec "$@"' <script> <program> <args…>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

const SOURCE_AND_EXEC: &str = r#"source "$0" && exec "$@""#;

impl ProcessRunner {
    fn command(command: &ToolCommand) -> Command {
        let mut process = match &command.env_script {
            Some(script) => {
                let mut process = Command::new("bash");
                process
                    .arg("-c")
                    .arg(SOURCE_AND_EXEC)
                    .arg(script)
                    .arg(&command.program);
                process
            }
            None => Command::new(&command.program),
        };
        process.args(&command.args).current_dir(&command.working_dir);
        process
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, command: &ToolCommand) -> Result<(), ToolError> {
        tracing::info!(dir = %command.working_dir.display(), "running {command}");
        let status = Self::command(command)
            .status()
            .map_err(|source| ToolError::Spawn {
                program: command.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ToolError::Exit {
                program: command.program.clone(),
                code: status.code(),
            })
        }
    }
}
