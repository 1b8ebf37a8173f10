// ABOUTME: Error types for deployment runs.
// ABOUTME: Covers label parsing, inventory lookup, failed steps and unhealthy cutovers.

use std::fmt;

use serde::Serialize;

use crate::control_plane::CommandError;
use crate::types::IdentityError;

use super::health::HealthOutcome;

/// A mutating control plane step of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Push,
    Rename,
    Delete,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Push => "push",
            Step::Rename => "rename",
            Step::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Terminal error of a deployment run.
///
/// None of these are retried. A run that fails after its first mutating
/// step leaves the completed steps in place for operator inspection.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The application label is malformed. Nothing was sent to the control plane.
    #[error("invalid application label: {0}")]
    Parse(#[from] IdentityError),

    /// Listing the current applications failed. Nothing was mutated.
    #[error("failed to query running applications: {0}")]
    QueryFailed(#[source] CommandError),

    /// A push, rename or delete failed. Earlier steps are not undone.
    #[error("{step} of '{target}' failed: {source}")]
    StepFailed {
        step: Step,
        target: String,
        #[source]
        source: CommandError,
    },

    /// The health gate did not pass; the superseded instance is kept.
    #[error("cutover to '{app}' did not become healthy ({outcome}); '{retained}' left in place")]
    CutoverUnhealthy {
        app: String,
        outcome: HealthOutcome,
        retained: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Parse,
    QueryFailed,
    StepFailed(Step),
    CutoverUnhealthy,
}

impl DeployError {
    pub(crate) fn step_failed(step: Step, target: &str, source: CommandError) -> Self {
        DeployError::StepFailed {
            step,
            target: target.to_string(),
            source,
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Parse(_) => DeployErrorKind::Parse,
            DeployError::QueryFailed(_) => DeployErrorKind::QueryFailed,
            DeployError::StepFailed { step, .. } => DeployErrorKind::StepFailed(*step),
            DeployError::CutoverUnhealthy { .. } => DeployErrorKind::CutoverUnhealthy,
        }
    }

    /// Whether the control plane may have been changed before the failure.
    pub fn may_have_mutated(&self) -> bool {
        matches!(
            self,
            DeployError::StepFailed { .. } | DeployError::CutoverUnhealthy { .. }
        )
    }
}
