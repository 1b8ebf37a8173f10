// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports inventory, health monitoring, plan classification and the orchestrator.

mod error;
mod health;
mod inventory;
mod orchestrator;
mod plan;
mod report;
mod request;
mod rollout;
mod state;

pub use error::{DeployError, DeployErrorKind, Step};
pub use health::{HealthMonitor, HealthOutcome, StatusReport};
pub use inventory::{InstanceRecord, InstanceState, list_instances};
pub use orchestrator::{DEFAULT_RENAME_SUFFIX, Orchestrator, RolloutSettings};
pub use plan::{DeploymentPlan, PlanKind};
pub use report::{DeployReport, ExecutedStep};
pub use request::DeploymentRequest;
pub use rollout::Rollout;
pub use state::{Completed, Planned, Pushed, Verified};
