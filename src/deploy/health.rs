// ABOUTME: Health monitor that polls application status during a scaleover.
// ABOUTME: Parses requested state and instance counters from the status text.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::control_plane::{CfCommand, ControlPlane, parse_instances};
use crate::types::ApplicationIdentity;

/// Instance states that will not recover without operator action.
const TERMINAL_STATES: &[&str] = &["crashed", "failed"];

/// Result of waiting for an application to become healthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthOutcome {
    Healthy,
    /// The status reported a terminal failure.
    Unhealthy(String),
    /// The deadline elapsed before the threshold was reached.
    TimedOut(Duration),
}

impl HealthOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthOutcome::Healthy)
    }
}

impl fmt::Display for HealthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthOutcome::Healthy => f.write_str("healthy"),
            HealthOutcome::Unhealthy(reason) => write!(f, "unhealthy: {reason}"),
            HealthOutcome::TimedOut(after) => write!(f, "timed out after {}s", after.as_secs()),
        }
    }
}

/// Signals extracted from one status response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub requested_state: Option<String>,
    pub running: Option<u32>,
    pub total: Option<u32>,
    pub failure: Option<String>,
}

impl StatusReport {
    /// Parse status text such as the output of `cf app <name>`.
    ///
    /// Looks for `requested state: <token>`, `instances: R/T`, and instance
    /// rows (`#0  crashed  ...`) carrying a terminal state.
    pub fn parse(text: &str) -> Self {
        let mut report = StatusReport::default();

        for line in text.lines().map(str::trim) {
            let lower = line.to_ascii_lowercase();

            if let Some(state) = lower.strip_prefix("requested state:") {
                let state = state.trim().to_string();
                if TERMINAL_STATES.contains(&state.as_str()) {
                    report.failure = Some(format!("requested state is {state}"));
                }
                report.requested_state = Some(state);
            } else if let Some(counts) = lower.strip_prefix("instances:") {
                if let Some((running, total)) = parse_instances(counts.trim()) {
                    report.running = Some(running);
                    report.total = Some(total);
                }
            } else if let Some(row) = lower.strip_prefix('#') {
                let mut columns = row.split_whitespace();
                let index = columns.next().unwrap_or_default();
                if let Some(state) = columns.next()
                    && TERMINAL_STATES.contains(&state)
                    && report.failure.is_none()
                {
                    report.failure = Some(format!("instance #{index} is {state}"));
                }
            }
        }

        report
    }
}

/// Polls an application's status until it is healthy, fails, or times out.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    poll_interval: Duration,
    min_healthy_ratio: f64,
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            min_healthy_ratio: 1.0,
        }
    }
}

impl HealthMonitor {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..Default::default()
        }
    }

    /// Fraction of instances that must be running, in `(0, 1]`.
    pub fn min_healthy_ratio(mut self, ratio: f64) -> Self {
        self.min_healthy_ratio = ratio;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Judge one status report. `None` means keep polling.
    pub fn evaluate(&self, report: &StatusReport) -> Option<HealthOutcome> {
        if let Some(failure) = &report.failure {
            return Some(HealthOutcome::Unhealthy(failure.clone()));
        }

        let started = report.requested_state.as_deref() == Some("started");
        let (Some(running), Some(total)) = (report.running, report.total) else {
            return None;
        };

        if started && total > 0 && running >= self.required_running(total) {
            Some(HealthOutcome::Healthy)
        } else {
            None
        }
    }

    fn required_running(&self, total: u32) -> u32 {
        let required = (f64::from(total) * self.min_healthy_ratio).ceil();
        // Ratio is validated to (0, 1], so this stays within 1..=total
        (required as u32).clamp(1, total)
    }

    /// Poll the status of `app` until healthy, unhealthy, or `deadline`.
    ///
    /// Status query errors count as "not yet healthy". The poll interval is
    /// clamped so the final poll lands on the deadline. A status query still
    /// in flight at the deadline is abandoned.
    pub async fn await_healthy<C: ControlPlane + ?Sized>(
        &self,
        plane: &C,
        app: &ApplicationIdentity,
        deadline: Duration,
    ) -> HealthOutcome {
        let start = Instant::now();
        let polling = self.poll_until_settled(plane, app, start, deadline);

        match tokio::time::timeout_at(start + deadline, polling).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) | Err(_) => {
                tracing::warn!(app = %app, ?deadline, "health check timed out");
                HealthOutcome::TimedOut(deadline)
            }
        }
    }

    /// Poll loop behind `await_healthy`. `None` once the deadline has passed.
    async fn poll_until_settled<C: ControlPlane + ?Sized>(
        &self,
        plane: &C,
        app: &ApplicationIdentity,
        start: Instant,
        deadline: Duration,
    ) -> Option<HealthOutcome> {
        let args = CfCommand::Status { app: app.label() }.args();

        loop {
            match plane.execute_quiet(&args).await {
                Ok(lines) => {
                    let report = StatusReport::parse(&lines.join("\n"));
                    tracing::debug!(app = %app, ?report, "status polled");
                    if let Some(outcome) = self.evaluate(&report) {
                        return Some(outcome);
                    }
                }
                Err(e) => {
                    tracing::debug!(app = %app, error = %e, "status query failed, retrying");
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= deadline {
                return None;
            }

            tokio::time::sleep(self.poll_interval.min(deadline - elapsed)).await;
        }
    }
}
