//! Process operations backed by the host OS

use async_trait::async_trait;
use pyfreeze_errors::{Error, PlatformError};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use super::{CommandOutput, OutputMode, PlatformCommand, ProcessOperations};

/// Runs commands with `tokio::process` and resolves tools with `which`
#[derive(Debug, Default)]
pub struct HostProcessOperations;

impl HostProcessOperations {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessOperations for HostProcessOperations {
    async fn execute_command(&self, cmd: PlatformCommand) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        let mut command = Command::new(cmd.program());
        command.args(cmd.get_args());

        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        let spawn_error = |e: std::io::Error| PlatformError::ProcessExecutionFailed {
            command: cmd.program().to_string(),
            message: e.to_string(),
        };

        let output = match cmd.get_output_mode() {
            OutputMode::Capture => {
                let output = command.output().await.map_err(spawn_error)?;
                CommandOutput {
                    exit_code: output.status.code(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                }
            }
            OutputMode::Inherit => {
                let status = command
                    .stdin(Stdio::null())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .await
                    .map_err(spawn_error)?;
                CommandOutput {
                    exit_code: status.code(),
                    ..CommandOutput::default()
                }
            }
        };

        debug!(
            program = cmd.program(),
            exit_code = ?output.exit_code,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "command finished"
        );

        Ok(output)
    }

    fn which(&self, program: &str) -> Result<PathBuf, Error> {
        which::which(program).map_err(|_| {
            Error::from(PlatformError::CommandNotFound {
                command: program.to_string(),
            })
        })
    }
}
