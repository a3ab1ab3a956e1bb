use grc_desk::modals::{ControllerOptions, ModalController, ModalKind};
use grc_desk::replay::{self, SessionScript};
use std::time::Duration;

use test_utils::{DASHBOARD_SESSION, write_temp_file};

#[tokio::test]
async fn test_dashboard_session_passes() {
    let (_dir, path) = write_temp_file("session.json", DASHBOARD_SESSION);
    let script = SessionScript::load(&path).expect("valid script");
    let controller = ModalController::new();

    let report = replay::run(&controller, &script).await;

    let failures: Vec<_> = report.failures().map(|s| s.detail.clone()).collect();
    assert!(failures.is_empty(), "unexpected failures: {failures:?}");
    assert!(report.passed());
    assert!(report.final_state.is_closed());
    assert_eq!(controller.failed_submissions(), 1);
}

#[tokio::test]
async fn test_close_during_submit_is_ignored() {
    let script = SessionScript::from_json(
        r#"{"steps":[
            {"op":"open","kind":"new-corrective-action","payload":{"title":"Rotate keys"}},
            {"op":"submit","delay_ms":20,"close_during":true}
        ]}"#,
    )
    .expect("valid script");
    let controller = ModalController::new();

    let report = replay::run(&controller, &script).await;

    assert!(report.passed());
    assert!(report.steps[1].detail.contains("close ignored while busy"));
    assert!(controller.active().is_none());
}

#[tokio::test]
async fn test_expectation_mismatch_reported() {
    let script = SessionScript::from_json(
        r#"{"steps":[
            {"op":"open","kind":"view-details","payload":{"record":"risk","id":"RSK-9"}},
            {"op":"expect","open":"schedule-review","busy":true}
        ]}"#,
    )
    .expect("valid script");
    let controller = ModalController::new();

    let report = replay::run(&controller, &script).await;

    let failure = report.failures().next().expect("one failure");
    assert_eq!(failure.index, 2);
    assert!(failure.detail.contains("expected schedule-review open"));
    assert!(failure.detail.contains("busy=true"));
    assert!(controller.is_open(ModalKind::ViewDetails));
}

#[tokio::test]
async fn test_unknown_kind_step_fails() {
    let script = SessionScript::from_json(
        r#"{"steps":[{"op":"open","kind":"delete-register"},{"op":"expect","open":"none"}]}"#,
    )
    .expect("valid script");

    let report = replay::run(&ModalController::new(), &script).await;

    assert!(!report.steps[0].ok);
    assert!(report.steps[0].detail.contains("Unknown modal kind"));
    assert!(report.steps[1].ok);
}

#[tokio::test]
async fn test_timeout_counts_as_failure() {
    let script = SessionScript::from_json(
        r#"{"steps":[
            {"op":"open","kind":"edit-improvement","payload":{"id":"IMP-2"}},
            {"op":"submit","delay_ms":200},
            {"op":"expect","open":"edit-improvement","busy":false}
        ]}"#,
    )
    .expect("valid script");
    let controller = ModalController::with_options(ControllerOptions {
        submit_timeout: Some(Duration::from_millis(20)),
        ..Default::default()
    });

    let report = replay::run(&controller, &script).await;

    assert!(!report.steps[1].ok);
    assert!(report.steps[1].detail.contains("timed out"));
    assert!(report.steps[2].ok);
}
