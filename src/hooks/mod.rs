// ABOUTME: Project hooks run around a deployment.
// ABOUTME: Executable scripts in .zdd/hooks receive the run's details as ZDD_* variables.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::deploy::PlanKind;
use crate::types::ApplicationIdentity;

/// Directory, relative to the project, holding hook scripts.
pub const HOOKS_DIR: &str = ".zdd/hooks";

/// Where in a run a hook fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    /// Before the control plane is contacted.
    PreDeploy,
    /// After a successful run.
    PostDeploy,
    /// After a failed run.
    OnError,
}

impl HookPoint {
    pub fn filename(self) -> &'static str {
        match self {
            HookPoint::PreDeploy => "pre-deploy",
            HookPoint::PostDeploy => "post-deploy",
            HookPoint::OnError => "on-error",
        }
    }

    /// A failing fatal hook stops the run; the others only warn.
    pub fn is_fatal(self) -> bool {
        self == HookPoint::PreDeploy
    }
}

/// Details of the run handed to hook scripts.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub app: ApplicationIdentity,
    pub plan: Option<PlanKind>,
    /// Instance superseded by the run.
    pub previous: Option<String>,
    pub error: Option<String>,
}

impl HookContext {
    pub fn new(app: &ApplicationIdentity) -> Self {
        Self {
            app: app.clone(),
            plan: None,
            previous: None,
            error: None,
        }
    }

    pub fn with_plan(mut self, plan: PlanKind) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn with_previous(mut self, previous: Option<String>) -> Self {
        self.previous = previous;
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Environment variables for the hook process. Unset details are omitted.
    pub fn env(&self) -> Vec<(&'static str, String)> {
        let host = gethostname::gethostname().to_string_lossy().into_owned();
        let mut vars = vec![
            ("ZDD_APP", self.app.label().to_string()),
            ("ZDD_BASE_NAME", self.app.base_name().to_string()),
            ("ZDD_VERSION", self.app.version().to_string()),
            ("ZDD_HOST", host),
        ];
        vars.extend(self.plan.map(|plan| ("ZDD_PLAN", plan.to_string())));
        vars.extend(self.previous.clone().map(|p| ("ZDD_PREVIOUS", p)));
        vars.extend(self.error.clone().map(|e| ("ZDD_ERROR", e)));
        vars
    }
}

/// Outcome of one hook execution.
#[derive(Debug)]
pub struct HookResult {
    pub point: HookPoint,
    pub success: bool,
    /// `None` when the script could not be started or was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl HookResult {
    /// One-line description of a failure for warnings.
    pub fn summary(&self) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exited with {code}"),
            None => "did not run to completion".to_string(),
        };
        match self.stderr.lines().rev().find(|l| !l.trim().is_empty()) {
            Some(detail) => format!("{} hook {status}: {}", self.point.filename(), detail.trim()),
            None => format!("{} hook {status}", self.point.filename()),
        }
    }
}

/// Finds and runs hook scripts for one project directory.
pub struct HookRunner {
    dir: PathBuf,
}

impl HookRunner {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            dir: project_dir.join(HOOKS_DIR),
        }
    }

    pub fn hook_exists(&self, point: HookPoint) -> bool {
        self.script(point).is_file()
    }

    fn script(&self, point: HookPoint) -> PathBuf {
        self.dir.join(point.filename())
    }

    /// Run the hook for `point`. `None` when the project has no such hook.
    pub async fn run(&self, point: HookPoint, context: &HookContext) -> Option<HookResult> {
        let script = self.script(point);
        if !script.is_file() {
            tracing::debug!(hook = point.filename(), "no hook installed");
            return None;
        }

        tracing::info!(hook = point.filename(), path = %script.display(), "running hook");
        let result = match Command::new(&script)
            .envs(context.env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
        {
            Ok(out) => HookResult {
                point,
                success: out.status.success(),
                exit_code: out.status.code(),
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            },
            Err(e) => HookResult {
                point,
                success: false,
                exit_code: None,
                stdout: String::new(),
                stderr: e.to_string(),
            },
        };

        if !result.success {
            tracing::warn!(hook = point.filename(), code = ?result.exit_code, "hook failed");
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> HookContext {
        HookContext::new(&ApplicationIdentity::parse("myTestApp#1.2.3-abcde").unwrap())
    }

    fn lookup<'a>(vars: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn only_pre_deploy_is_fatal() {
        assert!(HookPoint::PreDeploy.is_fatal());
        assert!(!HookPoint::PostDeploy.is_fatal());
        assert!(!HookPoint::OnError.is_fatal());
    }

    #[test]
    fn env_carries_identity_and_plan() {
        let vars = context()
            .with_plan(PlanKind::VersionReplacement)
            .with_previous(Some("myTestApp#1.2.2-abcde".to_string()))
            .env();

        assert_eq!(lookup(&vars, "ZDD_APP"), Some("myTestApp#1.2.3-abcde"));
        assert_eq!(lookup(&vars, "ZDD_BASE_NAME"), Some("myTestApp"));
        assert_eq!(lookup(&vars, "ZDD_VERSION"), Some("1.2.3-abcde"));
        assert_eq!(lookup(&vars, "ZDD_PLAN"), Some("version-replacement"));
        assert_eq!(lookup(&vars, "ZDD_PREVIOUS"), Some("myTestApp#1.2.2-abcde"));
        assert!(lookup(&vars, "ZDD_HOST").is_some());
    }

    #[test]
    fn unset_details_are_omitted() {
        let vars = context().env();
        assert!(lookup(&vars, "ZDD_PLAN").is_none());
        assert!(lookup(&vars, "ZDD_PREVIOUS").is_none());
        assert!(lookup(&vars, "ZDD_ERROR").is_none());
    }

    #[test]
    fn summary_uses_last_stderr_line() {
        let result = HookResult {
            point: HookPoint::PostDeploy,
            success: false,
            exit_code: Some(2),
            stdout: String::new(),
            stderr: "notifying\nslack webhook returned 500\n".to_string(),
        };
        assert_eq!(
            result.summary(),
            "post-deploy hook exited with 2: slack webhook returned 500"
        );
    }

    #[test]
    fn missing_directory_has_no_hooks() {
        let runner = HookRunner::new(Path::new("/nonexistent"));
        assert!(!runner.hook_exists(HookPoint::PreDeploy));
    }
}
