#![allow(dead_code)]

//! Shared helpers for integration tests.

use std::path::{Path, PathBuf};

use clpctl::application::{ClusterOrchestrator, ReadinessPoller};
use clpctl::domain::layout::InstallLayout;
use clpctl::domain::spec::ClusterSpec;
use clpctl::testkit::clock::RecordingSleeper;
use clpctl::testkit::config::retry_policy;
use clpctl::testkit::runtime::FakeRuntime;

pub type TestOrchestrator<'a> = ClusterOrchestrator<&'a FakeRuntime, &'a RecordingSleeper>;

/// Orchestrator over the fake runtime with a five-attempt retry budget,
/// two workers and no user mapping.
pub fn orchestrator<'a>(
    runtime: &'a FakeRuntime,
    sleeper: &'a RecordingSleeper,
    install_root: &Path,
) -> TestOrchestrator<'a> {
    ClusterOrchestrator::new(
        runtime,
        ReadinessPoller::new(retry_policy(5), sleeper),
        InstallLayout::new(install_root),
    )
    .with_worker_concurrency(2)
    .with_user(None)
}

/// A spec named `name` reading input logs from `input`.
pub fn spec(name: &str, input: &Path) -> ClusterSpec {
    let mut spec = ClusterSpec::named(name);
    spec.input_logs_directory = input.to_path_buf();
    spec
}

pub fn container_mounts(runtime: &FakeRuntime, name: &str) -> Vec<PathBuf> {
    runtime
        .descriptor(name)
        .map(|d| d.volumes.iter().map(|v| v.container.clone()).collect())
        .unwrap_or_default()
}
