use std::io::ErrorKind;

use async_trait::async_trait;
use reana_status_api::{
    StatusError,
    StatusResult,
};
use tokio::process::Command;

/// Runs host utilities and returns their standard output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Output with trailing line terminators stripped; a missing program or
    /// a non-zero exit is an error
    async fn run(&self, program: &str, args: &[&str]) -> StatusResult<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> StatusResult<String> {
        let command_line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(command = %command_line, "Running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StatusError::CommandNotFound(program.to_string()),
                _ => StatusError::Io(e),
            })?;

        if !output.status.success() {
            return Err(StatusError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(['\r', '\n'])
            .to_string())
    }
}
