//! Membership-driven teardown.
//!
//! Teardown never consults the runtime config: whatever is attached to the
//! cluster network is stopped and removed, then the network itself.

use serde::Serialize;
use tracing::{info, warn};

use super::network;
use crate::domain::membership::Member;
use crate::error::{Error, Result};
use crate::port::ContainerRuntime;

/// A teardown operation that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownFailure {
    pub target: String,
    pub operation: &'static str,
    pub error: String,
}

/// Outcome of tearing a cluster down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub cluster: String,
    /// Containers that were stopped and removed.
    pub removed: Vec<String>,
    pub failures: Vec<TeardownFailure>,
    pub network_removed: bool,
}

impl TeardownReport {
    /// Whether every member and the network were removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.network_removed
    }

    fn record(&mut self, target: &str, operation: &'static str, error: &Error) {
        warn!(
            cluster = %self.cluster,
            resource = target,
            operation,
            error = %error,
            "Teardown step failed"
        );
        self.failures.push(TeardownFailure {
            target: target.to_string(),
            operation,
            error: error.to_string(),
        });
    }
}

/// Stop and remove every container on the cluster network, then the network.
///
/// Individual failures are collected in the report and do not stop the loop.
///
/// # Errors
///
/// [`Error::NotProvisioned`] if the network does not exist. No container
/// operation is attempted in that case.
pub fn teardown<R: ContainerRuntime>(runtime: &R, cluster: &str) -> Result<TeardownReport> {
    let Some(membership) = network::membership(runtime, cluster)? else {
        return Err(Error::NotProvisioned {
            cluster: cluster.to_string(),
        });
    };

    let mut report = TeardownReport {
        cluster: cluster.to_string(),
        ..TeardownReport::default()
    };

    for member in membership {
        remove_member(runtime, &member, &mut report);
    }

    match runtime.remove_network(cluster) {
        Ok(()) => {
            report.network_removed = true;
            info!(cluster, "Removed cluster network");
        }
        Err(e) => report.record(cluster, "remove network", &e),
    }

    Ok(report)
}

fn remove_member<R: ContainerRuntime>(runtime: &R, member: &Member, report: &mut TeardownReport) {
    if let Err(e) = runtime.stop_container(&member.id) {
        report.record(&member.name, "stop", &e);
        return;
    }
    if let Err(e) = runtime.remove_container(&member.id) {
        report.record(&member.name, "remove", &e);
        return;
    }
    info!(cluster = %report.cluster, container = %member.name, "Removed container");
    report.removed.push(member.name.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::runtime::FakeRuntime;

    #[test]
    fn unknown_cluster_is_not_provisioned_without_container_calls() {
        let runtime = FakeRuntime::new();
        let result = teardown(&runtime, "ghost");

        assert!(matches!(result, Err(Error::NotProvisioned { .. })));
        assert!(runtime.mutating_calls().is_empty());
    }

    #[test]
    fn removes_every_member_including_out_of_band() {
        let runtime = FakeRuntime::new();
        runtime.add_network("c1");
        runtime.attach_out_of_band("c1", "c1-db");
        runtime.attach_out_of_band("c1", "stray");

        let report = teardown(&runtime, "c1").unwrap();

        assert!(report.is_clean());
        assert_eq!(report.removed, vec!["c1-db".to_string(), "stray".to_string()]);
        assert!(runtime.container_names().is_empty());
        assert!(runtime.network_names().is_empty());
    }

    #[test]
    fn failure_on_one_member_does_not_stop_the_loop() {
        let runtime = FakeRuntime::new();
        runtime.add_network("c1");
        runtime.attach_out_of_band("c1", "c1-db");
        runtime.attach_out_of_band("c1", "c1-queue");
        runtime.fail_stop("c1-db");

        let report = teardown(&runtime, "c1").unwrap();

        assert!(!report.is_clean());
        assert_eq!(report.removed, vec!["c1-queue".to_string()]);
        assert_eq!(report.failures[0].target, "c1-db");
        assert_eq!(report.failures[0].operation, "stop");
        // The stuck member keeps the network alive.
        assert!(!report.network_removed);
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn empty_network_is_removed() {
        let runtime = FakeRuntime::new();
        runtime.add_network("c1");

        let report = teardown(&runtime, "c1").unwrap();
        assert!(report.is_clean());
        assert!(report.removed.is_empty());
    }
}
