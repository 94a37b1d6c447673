use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;

use super::error::ExecutorError;

/// A fully-resolved external tool invocation: the program, its ordered
/// argument vector, environment overrides applied on top of the inherited
/// environment, and which output streams to capture.
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub capture: Capture,
}

/// Which streams of the child process to buffer in memory. Uncaptured
/// streams are inherited from the parent process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capture {
    pub stdout: bool,
    pub stderr: bool,
}

/// Captured output of a completed process. A field is `Some` only when the
/// corresponding stream was captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, command: ProcessCommand) -> Result<ProcessOutput, ExecutorError>;
}

/// Executor backed by `tokio::process`. Failures (missing binary, non-zero
/// exit, signal death) surface as `ExecutorError` and are never retried.
pub struct TokioExecutor;

impl TokioExecutor {
    fn log_command_start(command: &ProcessCommand) {
        let rendered = shell_words::join(
            std::iter::once(command.program.as_str()).chain(command.args.iter().map(String::as_str)),
        );
        tracing::debug!("Executing subprocess: {}", rendered);

        if !command.env.is_empty() {
            tracing::trace!("Environment overrides: {:?}", command.env);
        }
    }

    fn stdio_for(capture: bool) -> Stdio {
        if capture {
            Stdio::piped()
        } else {
            Stdio::inherit()
        }
    }

    fn check_status(status: std::process::ExitStatus) -> Result<(), ExecutorError> {
        if status.success() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Err(ExecutorError::Signal(signal));
            }
        }

        Err(ExecutorError::ExitCode(status.code().unwrap_or(-1)))
    }
}

#[async_trait]
impl Executor for TokioExecutor {
    async fn execute(&self, command: ProcessCommand) -> Result<ProcessOutput, ExecutorError> {
        Self::log_command_start(&command);

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);
        cmd.envs(&command.env);
        cmd.stdin(Stdio::null());
        cmd.stdout(Self::stdio_for(command.capture.stdout));
        cmd.stderr(Self::stdio_for(command.capture.stderr));

        let child = cmd.spawn().map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                ExecutorError::CommandNotFound(command.program.clone())
            } else {
                ExecutorError::Io(error)
            }
        })?;

        let output = child.wait_with_output().await?;
        Self::check_status(output.status)?;

        Ok(ProcessOutput {
            stdout: command
                .capture
                .stdout
                .then(|| String::from_utf8(output.stdout))
                .transpose()?,
            stderr: command
                .capture
                .stderr
                .then(|| String::from_utf8(output.stderr))
                .transpose()?,
        })
    }
}
