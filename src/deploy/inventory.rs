// ABOUTME: Inventory query for running application instances.
// ABOUTME: Lists apps on the control plane and keeps those sharing a base name.

use serde::Serialize;

use crate::control_plane::{AppSummary, ControlPlane};
use crate::types::ApplicationIdentity;

use super::error::DeployError;

/// Requested state of an application as reported by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    Started,
    Stopped,
    Unknown,
}

impl InstanceState {
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "started" => InstanceState::Started,
            "stopped" => InstanceState::Stopped,
            _ => InstanceState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceState::Started => "started",
            InstanceState::Stopped => "stopped",
            InstanceState::Unknown => "unknown",
        }
    }
}

/// Snapshot of one deployed application taken during a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub identity: ApplicationIdentity,
    pub instance_count: u32,
    pub running_count: u32,
    pub state: InstanceState,
}

impl InstanceRecord {
    pub fn new(identity: ApplicationIdentity, state: InstanceState) -> Self {
        Self {
            identity,
            instance_count: 0,
            running_count: 0,
            state,
        }
    }

    /// Convert a listing row; `None` when the name is not a versioned label.
    pub fn from_summary(summary: &AppSummary) -> Option<Self> {
        let identity = ApplicationIdentity::parse(&summary.name).ok()?;
        Some(Self {
            identity,
            instance_count: summary.total_instances,
            running_count: summary.running_instances,
            state: InstanceState::from_token(&summary.state),
        })
    }
}

/// List every instance whose base name matches, regardless of version.
///
/// # Errors
///
/// Returns `DeployError::QueryFailed` if the listing call fails. Not retried.
pub async fn list_instances<C: ControlPlane + ?Sized>(
    plane: &C,
    base_name: &str,
) -> Result<Vec<InstanceRecord>, DeployError> {
    let apps = plane.list_apps().await.map_err(DeployError::QueryFailed)?;

    let records: Vec<InstanceRecord> = apps
        .iter()
        .filter_map(|app| {
            let record = InstanceRecord::from_summary(app);
            if record.is_none() {
                tracing::debug!(app = %app.name, "ignoring unversioned application");
            }
            record
        })
        .filter(|record| record.identity.base_name() == base_name)
        .collect();

    tracing::debug!(base_name, matches = records.len(), "inventory query complete");
    Ok(records)
}

/// Separate copies renamed aside by an earlier redeploy from live releases.
///
/// A copy is named `<label><suffix>`, which still parses as a release of the
/// same application. Returns `(live, renamed)`.
pub fn split_renamed(
    records: Vec<InstanceRecord>,
    suffix: &str,
) -> (Vec<InstanceRecord>, Vec<InstanceRecord>) {
    records.into_iter().partition(|record| {
        !record
            .identity
            .label()
            .strip_suffix(suffix)
            .is_some_and(|original| ApplicationIdentity::parse(original).is_ok())
    })
}
