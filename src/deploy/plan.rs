// ABOUTME: Deployment plan selection from the target identity and current inventory.
// ABOUTME: Classifies a run as a fresh deploy, a same-version redeploy, or a version replacement.

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::inventory::{InstanceRecord, InstanceState};
use super::request::DeploymentRequest;

/// How a run transitions the platform to the target release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentPlan {
    /// No instance of the application is deployed.
    FreshDeploy { scaleover: Option<Duration> },

    /// The exact release is already deployed; it is renamed aside, re-pushed,
    /// and the renamed copy deleted.
    SameVersionRedeploy {
        existing: InstanceRecord,
        scaleover: Option<Duration>,
    },

    /// A different release of the application is deployed; the new one is
    /// pushed alongside and the old one deleted.
    VersionReplacement {
        existing: InstanceRecord,
        scaleover: Option<Duration>,
    },
}

/// Plan variant without its payload, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanKind {
    FreshDeploy,
    SameVersionRedeploy,
    VersionReplacement,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanKind::FreshDeploy => "fresh-deploy",
            PlanKind::SameVersionRedeploy => "same-version-redeploy",
            PlanKind::VersionReplacement => "version-replacement",
        };
        f.write_str(name)
    }
}

impl DeploymentPlan {
    /// Classify a run. Pure: the same request and snapshot give the same plan.
    ///
    /// Returns the plan and a warning when the inventory holds more instances
    /// of the application than the plan accounts for. Those extra instances
    /// are left untouched.
    ///
    /// When several instances at other versions exist, the one most likely to
    /// be serving traffic is replaced: started before stopped, then highest
    /// version precedence, then most running instances.
    pub fn classify(
        request: &DeploymentRequest,
        inventory: &[InstanceRecord],
    ) -> (Self, Option<String>) {
        let target = request.target();
        let scaleover = request.scaleover();

        let candidates: Vec<&InstanceRecord> = inventory
            .iter()
            .filter(|record| record.identity.base_name() == target.base_name())
            .collect();

        if let Some(same) = candidates
            .iter()
            .find(|record| record.identity.is_same_release(target))
        {
            let warning = untouched_warning(&candidates, same);
            return (
                DeploymentPlan::SameVersionRedeploy {
                    existing: (*same).clone(),
                    scaleover,
                },
                warning,
            );
        }

        let Some(chosen) = candidates.iter().copied().max_by(|a, b| live_rank(a, b)) else {
            return (DeploymentPlan::FreshDeploy { scaleover }, None);
        };

        let warning = untouched_warning(&candidates, chosen);
        (
            DeploymentPlan::VersionReplacement {
                existing: chosen.clone(),
                scaleover,
            },
            warning,
        )
    }

    pub fn kind(&self) -> PlanKind {
        match self {
            DeploymentPlan::FreshDeploy { .. } => PlanKind::FreshDeploy,
            DeploymentPlan::SameVersionRedeploy { .. } => PlanKind::SameVersionRedeploy,
            DeploymentPlan::VersionReplacement { .. } => PlanKind::VersionReplacement,
        }
    }

    pub fn scaleover(&self) -> Option<Duration> {
        match self {
            DeploymentPlan::FreshDeploy { scaleover }
            | DeploymentPlan::SameVersionRedeploy { scaleover, .. }
            | DeploymentPlan::VersionReplacement { scaleover, .. } => *scaleover,
        }
    }

    /// The deployed instance this plan supersedes, if any.
    pub fn existing(&self) -> Option<&InstanceRecord> {
        match self {
            DeploymentPlan::FreshDeploy { .. } => None,
            DeploymentPlan::SameVersionRedeploy { existing, .. }
            | DeploymentPlan::VersionReplacement { existing, .. } => Some(existing),
        }
    }
}

fn live_rank(a: &InstanceRecord, b: &InstanceRecord) -> Ordering {
    let started = |r: &InstanceRecord| r.state == InstanceState::Started;
    started(a)
        .cmp(&started(b))
        .then_with(|| a.identity.version().cmp_precedence(b.identity.version()))
        .then_with(|| a.running_count.cmp(&b.running_count))
}

fn untouched_warning(candidates: &[&InstanceRecord], chosen: &InstanceRecord) -> Option<String> {
    let others: Vec<&str> = candidates
        .iter()
        .filter(|record| record.identity != chosen.identity)
        .map(|record| record.identity.label())
        .collect();

    if others.is_empty() {
        return None;
    }

    Some(format!(
        "found {} instances of '{}'; using '{}' and leaving {} untouched",
        candidates.len(),
        chosen.identity.base_name(),
        chosen.identity,
        others.join(", ")
    ))
}
