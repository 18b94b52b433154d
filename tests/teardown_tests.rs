mod support;

use clpctl::error::Error;
use clpctl::testkit::clock::RecordingSleeper;
use clpctl::testkit::runtime::{Call, FakeRuntime};

#[test]
fn teardown_removes_out_of_band_members() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());

    orchestrator.start(&support::spec("c1", input.path())).unwrap();
    runtime.attach_out_of_band("c1", "c1-debug-shell");

    let report = orchestrator.stop("c1").unwrap();

    assert!(report.is_clean());
    assert_eq!(report.removed.len(), 4);
    assert!(report.removed.iter().any(|name| name == "c1-debug-shell"));
    assert!(runtime.container_names().is_empty());
    assert!(runtime.network_names().is_empty());
}

#[test]
fn teardown_ignores_containers_on_other_networks() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());

    orchestrator.start(&support::spec("c1", input.path())).unwrap();
    runtime.attach_out_of_band("c2", "c2");

    orchestrator.stop("c1").unwrap();

    assert_eq!(runtime.container_names(), vec!["c2".to_string()]);
    assert_eq!(runtime.network_names(), vec!["c2".to_string()]);
}

#[test]
fn unknown_cluster_is_not_provisioned_and_untouched() {
    let root = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());

    let result = orchestrator.stop("nope");

    match result {
        Err(Error::NotProvisioned { cluster }) => assert_eq!(cluster, "nope"),
        other => panic!("expected NotProvisioned, got {other:?}"),
    }
    assert_eq!(runtime.calls(), vec![Call::InspectNetwork("nope".to_string())]);
}

#[test]
fn failed_stop_is_reported_and_others_still_removed() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());

    orchestrator.start(&support::spec("c1", input.path())).unwrap();
    runtime.fail_stop("c1-queue");

    let report = orchestrator.stop("c1").unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.removed.len(), 2);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].target, "c1-queue");
    assert_eq!(report.failures[0].operation, "stop");
    assert!(!report.network_removed);
    assert_eq!(runtime.container_names(), vec!["c1-queue".to_string()]);
}
