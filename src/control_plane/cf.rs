// ABOUTME: Process-backed control plane that drives the cf CLI.
// ABOUTME: Spawns the binary per command with a timeout and captures its output.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use snafu::ResultExt;
use tokio::process::Command;

use super::apps::{AppSummary, parse_apps_table};
use super::command::CfCommand;
use super::error::{CommandError, FailedSnafu, SpawnSnafu, TimeoutSnafu};
use super::plane::ControlPlane;

/// Default binary name, resolved through `PATH`.
pub const DEFAULT_CF_BINARY: &str = "cf";

/// Control plane reached through the `cf` command-line client.
///
/// The client must already be logged in and targeted at an org and space.
#[derive(Debug, Clone)]
pub struct CfCli {
    binary: PathBuf,
    command_timeout: Duration,
}

impl CfCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            command_timeout: Duration::from_secs(600),
        }
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    async fn run(&self, args: &[String], echo: bool) -> Result<Vec<String>, CommandError> {
        let program = self.binary.display().to_string();
        let command_line = format!("{} {}", program, args.join(" "));
        tracing::debug!(command = %command_line, "running control plane command");

        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .context(SpawnSnafu {
                program: program.clone(),
            })?;

        // Dropping the future on timeout kills the child (kill_on_drop)
        let waited = tokio::time::timeout(self.command_timeout, child.wait_with_output()).await;
        let output = match waited {
            Ok(result) => result.context(SpawnSnafu { program })?,
            Err(_) => {
                return TimeoutSnafu {
                    command: command_line,
                    timeout: self.command_timeout,
                }
                .fail();
            }
        };

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();

        if echo {
            for line in &lines {
                println!("{line}");
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            // cf reports most failures on stdout after a FAILED marker
            let detail = if stderr.is_empty() {
                lines
                    .iter()
                    .rev()
                    .find(|line| !line.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| "no output".to_string())
            } else {
                stderr
            };

            return FailedSnafu {
                command: command_line,
                status: output.status.to_string(),
                detail,
            }
            .fail();
        }

        Ok(lines)
    }
}

impl Default for CfCli {
    fn default() -> Self {
        Self::new(DEFAULT_CF_BINARY)
    }
}

#[async_trait]
impl ControlPlane for CfCli {
    async fn execute(&self, args: &[String]) -> Result<Vec<String>, CommandError> {
        self.run(args, true).await
    }

    async fn execute_quiet(&self, args: &[String]) -> Result<Vec<String>, CommandError> {
        self.run(args, false).await
    }

    async fn list_apps(&self) -> Result<Vec<AppSummary>, CommandError> {
        let lines = self.run(&CfCommand::Apps.args(), false).await?;
        Ok(parse_apps_table(&lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_plane::CommandErrorKind;

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let cli = CfCli::new("/nonexistent/zdd-test-cf");
        let err = cli.execute_quiet(&["apps".to_string()]).await.unwrap_err();
        assert_eq!(err.kind(), CommandErrorKind::Unavailable);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_output_lines() {
        let cli = CfCli::new("echo");
        let lines = cli
            .execute_quiet(&["requested state: started".to_string()])
            .await
            .unwrap();
        assert_eq!(lines, ["requested state: started"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_failed() {
        let cli = CfCli::new("false");
        let err = cli.execute_quiet(&[]).await.unwrap_err();
        assert_eq!(err.kind(), CommandErrorKind::Failed);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_command_times_out() {
        let cli = CfCli::new("sleep").command_timeout(Duration::from_millis(50));
        let err = cli.execute_quiet(&["5".to_string()]).await.unwrap_err();
        assert_eq!(err.kind(), CommandErrorKind::TimedOut);
    }
}
