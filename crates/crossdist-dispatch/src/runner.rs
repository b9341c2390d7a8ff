//! Subprocess execution.

use std::process::Command;

use crate::job::CommandSpec;

/// Exit information and captured streams of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Whether the command exited successfully.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Runs build commands to completion.
///
/// Implementations are shared between worker threads.
pub trait JobRunner: Sync {
    /// Run `command`, wait for it, and capture both output streams.
    ///
    /// An `Err` means the command could not be started at all.
    fn run(&self, command: &CommandSpec) -> std::io::Result<CapturedOutput>;
}

/// Runs commands as real subprocesses of this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl JobRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> std::io::Result<CapturedOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()?;

        Ok(CapturedOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
