//! Host primitives the engine mutates through.
//!
//! The engine never touches the process environment or spawns anything
//! directly; it goes through [`Host`] so a dry run and a live run share one
//! evaluation path and tests can record what would have happened.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{OptOutError, Result};

/// Captured result of a finished external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub trait Host {
    /// Set a variable in the current process environment.
    fn set_var(&mut self, name: &str, value: &str);

    /// Resolve `program` on the search path.
    fn resolve_executable(&mut self, program: &str) -> Result<PathBuf>;

    /// Spawn `program` with `args` and block until it exits.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`]; only a
    /// failure to spawn or wait is an `Err`.
    fn run_command(&mut self, program: &Path, args: &[&str]) -> Result<CommandOutput>;
}

/// The real host: process environment, `PATH` lookup and child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn set_var(&mut self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }

    fn resolve_executable(&mut self, program: &str) -> Result<PathBuf> {
        which::which(program).map_err(|_| OptOutError::ExecutableNotFound(program.to_string()))
    }

    fn run_command(&mut self, program: &Path, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| OptOutError::CommandExecutionFailed {
                program: program.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
