// ABOUTME: Rollout struct parameterized by state marker, with its transitions.
// ABOUTME: Each transition issues one control plane step and consumes self.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::control_plane::{CfCommand, ControlPlane};
use crate::types::ApplicationIdentity;

use super::error::{DeployError, Step};
use super::health::HealthMonitor;
use super::plan::{DeploymentPlan, PlanKind};
use super::report::{DeployReport, ExecutedStep};
use super::request::DeploymentRequest;
use super::state::{Completed, Planned, Pushed, Verified};

/// A deployment run in progress, parameterized by its current state.
///
/// Deleting the superseded instance is only reachable from `Verified`, which
/// is only reachable after a successful push and, when a scaleover window is
/// set, a passing health gate.
#[derive(Debug)]
pub struct Rollout<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) plan: PlanKind,
    pub(crate) scaleover: Option<Duration>,
    pub(crate) retiring: Option<String>,
    pub(crate) steps: Vec<ExecutedStep>,
    pub(crate) health_checked: bool,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) state: S,
}

impl<S> Rollout<S> {
    fn transition<T>(self, state: T) -> Rollout<T> {
        Rollout {
            request: self.request,
            plan: self.plan,
            scaleover: self.scaleover,
            retiring: self.retiring,
            steps: self.steps,
            health_checked: self.health_checked,
            started_at: self.started_at,
            state,
        }
    }

    pub fn target(&self) -> &ApplicationIdentity {
        self.request.target()
    }

    /// Name of the instance that will be deleted once the cutover completes.
    pub fn retiring(&self) -> Option<&str> {
        self.retiring.as_deref()
    }

    pub fn steps(&self) -> &[ExecutedStep] {
        &self.steps
    }

    async fn issue<C: ControlPlane + ?Sized>(
        &mut self,
        plane: &C,
        step: Step,
        target: &str,
        command: CfCommand<'_>,
    ) -> Result<(), DeployError> {
        tracing::debug!(%step, target, "issuing step");
        plane
            .execute(&command.args())
            .await
            .map_err(|e| DeployError::step_failed(step, target, e))?;

        self.steps.push(ExecutedStep {
            step,
            target: target.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Planned
// =============================================================================

impl Rollout<Planned> {
    pub fn new(request: DeploymentRequest, plan: &DeploymentPlan) -> Self {
        Rollout {
            request,
            plan: plan.kind(),
            scaleover: plan.scaleover(),
            retiring: None,
            steps: Vec::new(),
            health_checked: false,
            started_at: Utc::now(),
            state: Planned,
        }
    }

    /// Rename the deployed copy of the target release out of the way.
    ///
    /// The renamed instance becomes the one retired after cutover. A failed
    /// rename is not reverted.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::StepFailed` with `Step::Rename`.
    #[must_use = "rollout state must be used"]
    pub async fn free_name<C: ControlPlane + ?Sized>(
        mut self,
        plane: &C,
        existing: &ApplicationIdentity,
        temporary: String,
    ) -> Result<Rollout<Planned>, DeployError> {
        self.issue(
            plane,
            Step::Rename,
            existing.label(),
            CfCommand::Rename {
                from: existing.label(),
                to: &temporary,
            },
        )
        .await?;

        self.retiring = Some(temporary);
        Ok(self)
    }

    /// Mark an existing instance for deletion after cutover, without renaming.
    pub fn retire_after(mut self, name: &str) -> Rollout<Planned> {
        self.retiring = Some(name.to_string());
        self
    }

    /// Push the target release.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::StepFailed` with `Step::Push`.
    #[must_use = "rollout state must be used"]
    pub async fn push<C: ControlPlane + ?Sized>(
        mut self,
        plane: &C,
    ) -> Result<Rollout<Pushed>, DeployError> {
        let request = self.request.clone();
        let target = request.target().label();
        self.issue(
            plane,
            Step::Push,
            target,
            CfCommand::Push {
                app: target,
                manifest: request.manifest(),
                artifact: request.artifact(),
            },
        )
        .await?;

        Ok(self.transition(Pushed))
    }
}

// =============================================================================
// Pushed -> Verified
// =============================================================================

impl Rollout<Pushed> {
    /// Whether `verify()` will poll health before allowing retirement.
    pub fn is_gated(&self) -> bool {
        self.scaleover.is_some() && self.retiring.is_some()
    }

    /// Gate the cutover on health when a scaleover window is set.
    ///
    /// Without a window (big-bang) or without an instance to retire, no
    /// status query is issued.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::CutoverUnhealthy` naming the retained instance
    /// when the new release is not healthy within the window.
    #[must_use = "rollout state must be used"]
    pub async fn verify<C: ControlPlane + ?Sized>(
        mut self,
        plane: &C,
        monitor: &HealthMonitor,
    ) -> Result<Rollout<Verified>, DeployError> {
        let Some(window) = self.scaleover else {
            return Ok(self.transition(Verified));
        };
        let Some(retained) = self.retiring.clone() else {
            return Ok(self.transition(Verified));
        };

        let outcome = monitor
            .await_healthy(plane, self.request.target(), window)
            .await;

        if !outcome.is_healthy() {
            return Err(DeployError::CutoverUnhealthy {
                app: self.request.target().label().to_string(),
                outcome,
                retained,
            });
        }

        self.health_checked = true;
        Ok(self.transition(Verified))
    }
}

// =============================================================================
// Verified -> Completed
// =============================================================================

impl Rollout<Verified> {
    /// Delete the superseded instance, if any.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::StepFailed` with `Step::Delete`.
    #[must_use = "rollout state must be used"]
    pub async fn retire<C: ControlPlane + ?Sized>(
        mut self,
        plane: &C,
        force: bool,
    ) -> Result<Rollout<Completed>, DeployError> {
        if let Some(name) = self.retiring.clone() {
            self.issue(
                plane,
                Step::Delete,
                &name,
                CfCommand::Delete { app: &name, force },
            )
            .await?;
        }

        Ok(self.transition(Completed))
    }
}

// =============================================================================
// Completed - Terminal State
// =============================================================================

impl Rollout<Completed> {
    /// Consume the rollout and summarize it.
    pub fn finish(self) -> DeployReport {
        DeployReport {
            app: self.request.target().label().to_string(),
            plan: self.plan,
            steps: self.steps,
            health_checked: self.health_checked,
            retired: self.retiring,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
