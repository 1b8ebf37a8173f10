// ABOUTME: Control plane command error types with the SNAFU pattern.
// ABOUTME: Covers spawn failures, timeouts and non-zero exits.

use std::time::Duration;

use snafu::Snafu;

/// Failure of a single control plane command.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CommandError {
    #[snafu(display("failed to run '{program}': {source}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("'{command}' timed out after {timeout:?}"))]
    Timeout { command: String, timeout: Duration },

    #[snafu(display("'{command}' exited with {status}: {detail}"))]
    Failed {
        command: String,
        status: String,
        detail: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandErrorKind {
    /// The CLI binary could not be started or waited on.
    Unavailable,
    /// The command did not finish within its timeout.
    TimedOut,
    /// The command ran and reported failure.
    Failed,
}

impl CommandError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> CommandErrorKind {
        match self {
            CommandError::Spawn { .. } => CommandErrorKind::Unavailable,
            CommandError::Timeout { .. } => CommandErrorKind::TimedOut,
            CommandError::Failed { .. } => CommandErrorKind::Failed,
        }
    }
}
