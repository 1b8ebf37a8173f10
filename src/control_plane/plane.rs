// ABOUTME: Command-execution capability for the remote control plane.
// ABOUTME: The orchestrator only talks to the platform through this trait.

use async_trait::async_trait;

use super::apps::AppSummary;
use super::error::CommandError;

/// Executes control plane commands and reads their output.
///
/// Implementations: [`CfCli`](super::CfCli) spawns the `cf` binary; tests
/// use a recording fake that captures the issued argument lists.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Run a command, echoing its output to the operator, and return the
    /// captured output lines.
    async fn execute(&self, args: &[String]) -> Result<Vec<String>, CommandError>;

    /// Run a command without echoing its output. Used for status polling.
    async fn execute_quiet(&self, args: &[String]) -> Result<Vec<String>, CommandError>;

    /// List all applications visible in the current target.
    async fn list_apps(&self) -> Result<Vec<AppSummary>, CommandError>;
}

