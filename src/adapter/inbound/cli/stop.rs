//! Handler for the `stop` command.

use serde_json::json;

use super::context::Context;
use super::output;
use crate::application::TeardownReport;
use crate::error::{Error, Result};

/// Execute the stop command.
///
/// Teardown keeps going past individual failures; any failure still makes
/// the command fail once everything possible has been removed.
pub fn execute(ctx: &Context) -> Result<()> {
    let cluster = ctx.spec.name.as_str();
    let pb = output::spinner(&format!("Stopping cluster {cluster}"));
    let report = match ctx.orchestrator().stop(cluster) {
        Ok(report) => report,
        Err(error) => {
            output::spinner_fail(&pb, &format!("Failed to stop cluster {cluster}"));
            return Err(error);
        }
    };

    if report.is_clean() {
        output::spinner_success(&pb, &format!("Stopped cluster {cluster}"));
    } else {
        output::spinner_fail(&pb, &format!("Cluster {cluster} was not fully removed"));
    }
    print_report(&report);
    outcome(&report)
}

fn outcome(report: &TeardownReport) -> Result<()> {
    if report.is_clean() {
        Ok(())
    } else {
        Err(Error::TeardownIncomplete {
            cluster: report.cluster.clone(),
            failures: report.failures.len(),
        })
    }
}

fn print_report(report: &TeardownReport) {
    if output::is_json() {
        output::json_output(json!({
            "command": "stop",
            "report": report,
        }));
        return;
    }

    for name in &report.removed {
        output::field("Removed", name);
    }
    for failure in &report.failures {
        output::warning(&format!(
            "{} {}: {}",
            failure.operation, failure.target, failure.error
        ));
    }
}
