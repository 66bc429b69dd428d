//! External process execution behind a substitutable capability.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::RunnerError;

/// Everything needed to run one external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Duration,
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the process to completion or until `invocation.timeout` elapses.
    ///
    /// # Errors
    ///
    /// - [`RunnerError::Spawn`] if the program cannot be started.
    /// - [`RunnerError::Timeout`] if it does not finish in time.
    async fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessOutput, RunnerError>;
}

/// Runs processes with `tokio::process`. The child is killed if the timeout
/// fires before it exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessOutput, RunnerError> {
        let program = invocation.program.display().to_string();
        let mut command = tokio::process::Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(invocation.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(RunnerError::Spawn { program, source }),
            Err(_) => {
                return Err(RunnerError::Timeout {
                    program,
                    timeout_secs: invocation.timeout.as_secs(),
                })
            }
        };

        Ok(ProcessOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
