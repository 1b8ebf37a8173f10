// ABOUTME: Summary of a completed deployment run.
// ABOUTME: Serializable so it can be emitted as a JSON output event.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::Step;
use super::plan::PlanKind;

/// A control plane step that completed, with the application it targeted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutedStep {
    pub step: Step,
    pub target: String,
}

/// What a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub app: String,
    pub plan: PlanKind,
    pub steps: Vec<ExecutedStep>,
    pub health_checked: bool,
    /// The superseded instance that was deleted, if any.
    pub retired: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeployReport {
    /// Step kinds in execution order.
    pub fn step_kinds(&self) -> Vec<Step> {
        self.steps.iter().map(|s| s.step).collect()
    }
}
