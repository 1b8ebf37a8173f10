// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording fake control plane and tracing setup for integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Once;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use zdd::control_plane::{AppSummary, CommandError, ControlPlane};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("zdd=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Status text for a started app with `running` of `total` instances up.
#[allow(dead_code)]
pub fn status_text(running: u32, total: u32) -> String {
    format!("requested state: started\ninstances: {running}/{total}\nurls: app.example.com")
}

/// Control plane fake that records every command and replies from a script.
///
/// Mutating commands (`execute`) and status polls (`execute_quiet`) are
/// recorded separately so tests can assert on the exact step sequence.
#[derive(Default)]
pub struct RecordingPlane {
    apps: Mutex<Vec<AppSummary>>,
    list_failure: Mutex<Option<String>>,
    failures: Mutex<HashMap<String, String>>,
    statuses: Mutex<VecDeque<String>>,
    status_delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<Vec<String>>>,
    quiet_calls: Mutex<Vec<Vec<String>>>,
    list_calls: Mutex<usize>,
}

#[allow(dead_code)]
impl RecordingPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Started apps with one running instance each.
    pub fn with_apps(self, names: &[&str]) -> Self {
        for name in names {
            self.apps
                .lock()
                .push(AppSummary::named(*name).with_instances("started", 1, 1));
        }
        self
    }

    pub fn with_app(self, app: AppSummary) -> Self {
        self.apps.lock().push(app);
        self
    }

    /// Fail every command whose first argument is `verb`.
    pub fn failing(self, verb: &str, message: &str) -> Self {
        self.failures
            .lock()
            .insert(verb.to_string(), message.to_string());
        self
    }

    pub fn failing_list(self, message: &str) -> Self {
        *self.list_failure.lock() = Some(message.to_string());
        self
    }

    /// Queue status replies. The last one repeats once the queue drains.
    pub fn with_statuses<S: Into<String>>(self, statuses: impl IntoIterator<Item = S>) -> Self {
        self.statuses
            .lock()
            .extend(statuses.into_iter().map(Into::into));
        self
    }

    /// Delay every status reply, as a hung `cf app` would.
    pub fn with_status_delay(self, delay: Duration) -> Self {
        *self.status_delay.lock() = Some(delay);
        self
    }

    /// Argument lists passed to `execute`, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    /// First argument of each `execute` call.
    pub fn verbs(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|args| args.first().cloned())
            .collect()
    }

    /// Argument lists passed to `execute_quiet`, in order.
    pub fn quiet_calls(&self) -> Vec<Vec<String>> {
        self.quiet_calls.lock().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock()
    }

    fn check_failure(&self, args: &[String]) -> Result<(), CommandError> {
        let verb = args.first().map(String::as_str).unwrap_or_default();
        match self.failures.lock().get(verb) {
            Some(message) => Err(command_failed(verb, message)),
            None => Ok(()),
        }
    }
}

/// Non-zero exit of `cf <verb>` with `detail` on stderr.
fn command_failed(verb: &str, detail: &str) -> CommandError {
    CommandError::Failed {
        command: format!("cf {verb}"),
        status: "exit status: 1".to_string(),
        detail: detail.to_string(),
    }
}

#[async_trait]
impl ControlPlane for RecordingPlane {
    async fn execute(&self, args: &[String]) -> Result<Vec<String>, CommandError> {
        self.calls.lock().push(args.to_vec());
        self.check_failure(args)?;
        Ok(vec!["OK".to_string()])
    }

    async fn execute_quiet(&self, args: &[String]) -> Result<Vec<String>, CommandError> {
        self.quiet_calls.lock().push(args.to_vec());
        let delay = *self.status_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_failure(args)?;

        let mut statuses = self.statuses.lock();
        let text = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        match text {
            Some(text) => Ok(text.lines().map(str::to_string).collect()),
            None => Err(command_failed("app", "no status scripted")),
        }
    }

    async fn list_apps(&self) -> Result<Vec<AppSummary>, CommandError> {
        *self.list_calls.lock() += 1;
        if let Some(message) = self.list_failure.lock().clone() {
            return Err(command_failed("apps", &message));
        }
        Ok(self.apps.lock().clone())
    }
}
