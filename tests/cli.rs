// ABOUTME: Integration tests for the zdd binary.
// ABOUTME: Drives real processes against a scripted stand-in for the cf CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_CF: &str = r#"#!/bin/sh
echo "$@" >> "$FAKE_CF_LOG"
if [ "$1" = "apps" ]; then
  echo "Getting apps in org demo / space dev as admin..."
  echo "OK"
  echo ""
  echo "name            requested state   instances   memory   disk   urls"
  echo "myApp#1.0.0-a   started           1/1         1G       1G     myapp.example.com"
fi
if [ "$1" = "push" ] && [ -n "$FAKE_CF_FAIL_PUSH" ]; then
  echo "FAILED"
  echo "Staging error: buildpack compile failed"
  exit 1
fi
exit 0
"#;

struct Workspace {
    dir: TempDir,
    cf: PathBuf,
    log: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let cf = dir.path().join("fake-cf");
        fs::write(&cf, FAKE_CF).unwrap();
        fs::set_permissions(&cf, fs::Permissions::from_mode(0o755)).unwrap();
        let log = dir.path().join("cf.log");
        Self { dir, cf, log }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn zdd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("zdd"));
        cmd.current_dir(self.path())
            .env("ZDD_CF_BINARY", &self.cf)
            .env("FAKE_CF_LOG", &self.log)
            .env_remove("RUST_LOG");
        cmd
    }

    fn cf_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[test]
fn help_describes_global_flags() {
    Workspace::new()
        .zdd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("COMMAND"));
}

#[test]
fn no_arguments_lists_registered_commands() {
    Workspace::new()
        .zdd()
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy-zdd"))
        .stdout(predicate::str::contains("zdd-status"));
}

#[test]
fn unknown_command_fails() {
    Workspace::new()
        .zdd()
        .arg("blue-green")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command 'blue-green'"));
}

#[test]
fn missing_manifest_is_a_usage_error() {
    let ws = Workspace::new();
    ws.zdd()
        .args(["deploy-zdd", "myApp#1.1.0-b", "-p", "app.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--manifest"));
    assert!(ws.cf_calls().is_empty());
}

#[test]
fn malformed_label_never_reaches_cf() {
    let ws = Workspace::new();
    ws.zdd()
        .args(["deploy-zdd", "myApp", "-f", "manifest.yml", "-p", "app.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid application label"));
    assert!(ws.cf_calls().is_empty());
}

#[test]
fn version_replacement_pushes_then_deletes() {
    let ws = Workspace::new();
    ws.zdd()
        .args(["deploy-zdd", "myApp#1.1.0-b", "-f", "manifest.yml", "-p", "app.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deployed myApp#1.1.0-b (version-replacement)"));

    assert_eq!(
        ws.cf_calls(),
        [
            "apps",
            "push myApp#1.1.0-b -f manifest.yml -p app.zip",
            "delete myApp#1.0.0-a -f",
        ]
    );
}

#[test]
fn same_version_renames_first() {
    let ws = Workspace::new();
    ws.zdd()
        .args(["--quiet", "deploy-zdd", "myApp#1.0.0-a", "-f", "m.yml", "-p", "a.zip"])
        .assert()
        .success();

    assert_eq!(
        ws.cf_calls(),
        [
            "apps",
            "rename myApp#1.0.0-a myApp#1.0.0-a-venerable",
            "push myApp#1.0.0-a -f m.yml -p a.zip",
            "delete myApp#1.0.0-a-venerable -f",
        ]
    );
}

#[test]
fn config_file_controls_rename_suffix() {
    let ws = Workspace::new();
    fs::write(ws.path().join("zdd.yml"), "rename_suffix: -old\nforce_delete: false\n").unwrap();

    ws.zdd()
        .args(["deploy-zdd", "myApp#1.0.0-a", "-f", "m.yml", "-p", "a.zip"])
        .assert()
        .success();

    let calls = ws.cf_calls();
    assert_eq!(calls[1], "rename myApp#1.0.0-a myApp#1.0.0-a-old");
    assert_eq!(calls[3], "delete myApp#1.0.0-a-old");
}

#[test]
fn failed_push_reports_step_and_stops() {
    let ws = Workspace::new();
    ws.zdd()
        .env("FAKE_CF_FAIL_PUSH", "1")
        .args(["deploy-zdd", "myApp#1.1.0-b", "-f", "m.yml", "-p", "a.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("push of 'myApp#1.1.0-b' failed"))
        .stderr(predicate::str::contains("buildpack compile failed"));

    assert_eq!(ws.cf_calls().len(), 2);
}

#[test]
fn failing_pre_deploy_hook_blocks_deploy() {
    let ws = Workspace::new();
    let hooks = ws.path().join(".zdd").join("hooks");
    fs::create_dir_all(&hooks).unwrap();
    fs::write(hooks.join("pre-deploy"), "#!/bin/sh\necho 'change freeze' >&2\nexit 1\n").unwrap();
    fs::set_permissions(hooks.join("pre-deploy"), fs::Permissions::from_mode(0o755)).unwrap();

    ws.zdd()
        .args(["deploy-zdd", "myApp#1.1.0-b", "-f", "m.yml", "-p", "a.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pre-deploy hook failed"));

    assert!(ws.cf_calls().is_empty());
}

#[test]
fn json_mode_emits_report_record() {
    let ws = Workspace::new();
    let output = ws
        .zdd()
        .args(["--json", "deploy-zdd", "myApp#1.1.0-b", "-f", "m.yml", "-p", "a.zip"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report = String::from_utf8(output)
        .unwrap()
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|event| event["event"] == "report")
        .expect("report event");

    assert_eq!(report["data"]["plan"], "version-replacement");
    assert_eq!(report["data"]["retired"], "myApp#1.0.0-a");
    assert_eq!(report["data"]["steps"][0]["step"], "push");
}

#[test]
fn status_lists_deployed_versions() {
    Workspace::new()
        .zdd()
        .args(["zdd-status", "myApp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("myApp#1.0.0-a"))
        .stdout(predicate::str::contains("1/1"));
}
