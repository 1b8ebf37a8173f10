// ABOUTME: Integration tests for health polling with a paused clock.
// ABOUTME: Covers thresholds, terminal states, query errors and deadline handling.

mod support;

use std::time::Duration;

use support::{RecordingPlane, status_text};
use zdd::deploy::{HealthMonitor, HealthOutcome};
use zdd::types::ApplicationIdentity;

fn app() -> ApplicationIdentity {
    ApplicationIdentity::parse("myTestApp#1.2.3-abcde").unwrap()
}

fn monitor() -> HealthMonitor {
    HealthMonitor::new(Duration::from_secs(5))
}

#[tokio::test(start_paused = true)]
async fn healthy_on_first_poll() {
    let plane = RecordingPlane::new().with_statuses([status_text(3, 3)]);

    let outcome = monitor()
        .await_healthy(&plane, &app(), Duration::from_secs(60))
        .await;

    assert_eq!(outcome, HealthOutcome::Healthy);
    assert_eq!(plane.quiet_calls().len(), 1);
    assert!(plane.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn waits_for_all_instances_by_default() {
    let plane = RecordingPlane::new().with_statuses([
        status_text(1, 3),
        status_text(2, 3),
        status_text(3, 3),
    ]);

    let outcome = monitor()
        .await_healthy(&plane, &app(), Duration::from_secs(60))
        .await;

    assert_eq!(outcome, HealthOutcome::Healthy);
    assert_eq!(plane.quiet_calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn ratio_lowers_the_threshold() {
    let plane = RecordingPlane::new().with_statuses([status_text(1, 4), status_text(2, 4)]);

    let outcome = monitor()
        .min_healthy_ratio(0.5)
        .await_healthy(&plane, &app(), Duration::from_secs(60))
        .await;

    assert_eq!(outcome, HealthOutcome::Healthy);
    assert_eq!(plane.quiet_calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stopped_app_times_out() {
    let plane = RecordingPlane::new().with_statuses(["requested state: stopped\ninstances: 0/10"]);

    let outcome = monitor()
        .await_healthy(&plane, &app(), Duration::from_secs(20))
        .await;

    assert_eq!(outcome, HealthOutcome::TimedOut(Duration::from_secs(20)));
    // polls at 0, 5, 10, 15 and 20 seconds
    assert_eq!(plane.quiet_calls().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn last_poll_lands_on_the_deadline() {
    let plane = RecordingPlane::new().with_statuses([status_text(0, 1)]);

    let start = tokio::time::Instant::now();
    let outcome = monitor()
        .await_healthy(&plane, &app(), Duration::from_secs(12))
        .await;

    assert!(matches!(outcome, HealthOutcome::TimedOut(_)));
    assert_eq!(start.elapsed(), Duration::from_secs(12));
}

#[tokio::test(start_paused = true)]
async fn crashed_instance_fails_fast() {
    let plane = RecordingPlane::new().with_statuses([
        "requested state: started\ninstances: 1/2\n#0 running 2024-01-01\n#1 crashed 2024-01-01",
    ]);

    let outcome = monitor()
        .await_healthy(&plane, &app(), Duration::from_secs(600))
        .await;

    assert!(matches!(outcome, HealthOutcome::Unhealthy(reason) if reason.contains("#1")));
    assert_eq!(plane.quiet_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn query_errors_keep_polling() {
    let plane = RecordingPlane::new().failing("app", "connection reset");

    let outcome = monitor()
        .await_healthy(&plane, &app(), Duration::from_secs(10))
        .await;

    assert_eq!(outcome, HealthOutcome::TimedOut(Duration::from_secs(10)));
    assert_eq!(plane.quiet_calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn hung_status_query_is_cut_off_at_the_deadline() {
    let plane = RecordingPlane::new()
        .with_statuses([status_text(3, 3)])
        .with_status_delay(Duration::from_secs(600));

    let start = tokio::time::Instant::now();
    let outcome = monitor()
        .await_healthy(&plane, &app(), Duration::from_secs(60))
        .await;

    assert_eq!(outcome, HealthOutcome::TimedOut(Duration::from_secs(60)));
    assert_eq!(start.elapsed(), Duration::from_secs(60));
    assert_eq!(plane.quiet_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_replies_within_the_deadline_still_count() {
    let plane = RecordingPlane::new()
        .with_statuses([status_text(0, 2), status_text(2, 2)])
        .with_status_delay(Duration::from_secs(20));

    let outcome = monitor()
        .await_healthy(&plane, &app(), Duration::from_secs(60))
        .await;

    assert_eq!(outcome, HealthOutcome::Healthy);
    assert_eq!(plane.quiet_calls().len(), 2);
}
