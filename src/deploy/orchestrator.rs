// ABOUTME: Top-level deployment orchestration.
// ABOUTME: Queries inventory, classifies the run, and drives the rollout state machine.

use crate::control_plane::ControlPlane;
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;
use crate::types::ApplicationIdentity;

use super::error::DeployError;
use super::health::HealthMonitor;
use super::inventory::{list_instances, split_renamed};
use super::plan::DeploymentPlan;
use super::report::DeployReport;
use super::request::DeploymentRequest;
use super::rollout::Rollout;

/// Suffix appended to the old instance's label during a same-version redeploy.
pub const DEFAULT_RENAME_SUFFIX: &str = "-venerable";

/// Knobs for how a rollout issues its steps.
#[derive(Debug, Clone)]
pub struct RolloutSettings {
    pub rename_suffix: String,
    pub force_delete: bool,
    pub monitor: HealthMonitor,
}

impl Default for RolloutSettings {
    fn default() -> Self {
        Self {
            rename_suffix: DEFAULT_RENAME_SUFFIX.to_string(),
            force_delete: true,
            monitor: HealthMonitor::default(),
        }
    }
}

/// Drives one deployment run against a control plane.
///
/// Steps are strictly sequential. The first failure stops the run and
/// nothing already done is reverted.
pub struct Orchestrator<'a, C: ?Sized> {
    plane: &'a C,
    settings: RolloutSettings,
}

impl<'a, C: ControlPlane + ?Sized> Orchestrator<'a, C> {
    pub fn new(plane: &'a C, settings: RolloutSettings) -> Self {
        Self { plane, settings }
    }

    /// Query, classify, and execute.
    ///
    /// # Errors
    ///
    /// `QueryFailed` before anything is mutated, otherwise `StepFailed` or
    /// `CutoverUnhealthy` from the rollout.
    pub async fn run(
        &self,
        request: &DeploymentRequest,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> Result<DeployReport, DeployError> {
        let target = request.target();

        output.step(&format!(
            "Looking up deployed instances of {}",
            target.base_name()
        ));
        let inventory = list_instances(self.plane, target.base_name()).await?;

        let (inventory, renamed) = split_renamed(inventory, &self.settings.rename_suffix);
        if !renamed.is_empty() {
            let labels: Vec<&str> = renamed.iter().map(|r| r.identity.label()).collect();
            diag.warn(Warning::renamed_leftover(format!(
                "leaving {} from an earlier redeploy untouched",
                labels.join(", ")
            )));
        }

        let (plan, warning) = DeploymentPlan::classify(request, &inventory);
        if let Some(warning) = warning {
            diag.warn(Warning::ambiguous_inventory(warning));
        }

        tracing::info!(app = %target, plan = %plan.kind(), "deployment plan selected");
        self.execute(request, &plan, output).await
    }

    /// Execute an already classified plan.
    ///
    /// # Errors
    ///
    /// `StepFailed` naming the failed step, or `CutoverUnhealthy`.
    pub async fn execute(
        &self,
        request: &DeploymentRequest,
        plan: &DeploymentPlan,
        output: &Output,
    ) -> Result<DeployReport, DeployError> {
        let rollout = Rollout::new(request.clone(), plan);

        let rollout = match plan {
            DeploymentPlan::FreshDeploy { .. } => {
                output.step("No deployed instance (first deploy)");
                rollout
            }
            DeploymentPlan::SameVersionRedeploy { existing, .. } => {
                let temporary = self.temporary_label(&existing.identity);
                output.step(&format!(
                    "Renaming {} to {}",
                    existing.identity, temporary
                ));
                rollout
                    .free_name(self.plane, &existing.identity, temporary)
                    .await?
            }
            DeploymentPlan::VersionReplacement { existing, .. } => {
                output.step(&format!("Replacing {}", existing.identity));
                rollout.retire_after(existing.identity.label())
            }
        };

        output.step(&format!("Pushing {}", request.target()));
        let rollout = rollout.push(self.plane).await?;

        if let (true, Some(window)) = (rollout.is_gated(), plan.scaleover()) {
            output.step(&format!(
                "Waiting up to {}s for {} to become healthy",
                window.as_secs(),
                request.target()
            ));
        }
        let rollout = rollout.verify(self.plane, &self.settings.monitor).await?;

        if let Some(retiring) = rollout.retiring() {
            output.step(&format!("Deleting {retiring}"));
        }
        let rollout = rollout
            .retire(self.plane, self.settings.force_delete)
            .await?;

        Ok(rollout.finish())
    }

    fn temporary_label(&self, existing: &ApplicationIdentity) -> String {
        format!("{}{}", existing.label(), self.settings.rename_suffix)
    }
}
