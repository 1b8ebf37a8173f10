// ABOUTME: Non-fatal findings gathered during a deployment run.
// ABOUTME: Reported to the operator once the run has finished, success or not.

use crate::output::Output;

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Several instances share the base name; extras were left alone.
    AmbiguousInventory,
    /// A copy renamed aside by an earlier redeploy is still deployed.
    RenamedLeftover,
    /// Steps already issued by a failed run were left in place.
    PartialRollout,
    /// A post-deploy or on-error hook failed.
    Hook,
}

#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn ambiguous_inventory(message: impl Into<String>) -> Self {
        Self::new(WarningKind::AmbiguousInventory, message)
    }

    pub fn renamed_leftover(message: impl Into<String>) -> Self {
        Self::new(WarningKind::RenamedLeftover, message)
    }

    pub fn partial_rollout(message: impl Into<String>) -> Self {
        Self::new(WarningKind::PartialRollout, message)
    }

    pub fn hook(message: impl Into<String>) -> Self {
        Self::new(WarningKind::Hook, message)
    }
}

/// Warnings collected over one run, in the order they were raised.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning. It is logged immediately and shown at `report`.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    /// Show every collected warning to the operator.
    pub fn report(&self, output: &Output) {
        for warning in &self.warnings {
            output.warning(&warning.message);
        }
    }
}
