//! Handler for the `start` command.

use serde_json::json;

use super::command::StartArgs;
use super::context::Context;
use super::output;
use crate::application::StartReport;
use crate::error::{Error, Result};

/// Execute the start command.
pub fn execute(ctx: &Context, args: &StartArgs) -> Result<()> {
    let mut orchestrator = ctx.orchestrator();
    if let Some(workers) = args.workers {
        orchestrator = orchestrator.with_worker_concurrency(workers);
    }

    let cluster = ctx.spec.name.as_str();
    let pb = output::spinner(&format!("Starting cluster {cluster}"));
    let result = orchestrator.start_with_progress(&ctx.spec, |step| {
        pb.set_message(format!("Starting cluster {cluster}: {step}"));
    });

    match result {
        Ok(report) => {
            output::spinner_success(&pb, &format!("Started cluster {cluster}"));
            print_report(&report);
            Ok(())
        }
        Err(error) => {
            output::spinner_fail(&pb, &format!("Failed to start cluster {cluster}"));
            if left_partial_cluster(&error) {
                output::hint("containers that already started are still running; run `clpctl stop` to remove them");
            }
            Err(error)
        }
    }
}

/// Whether the failure happened after something external was created.
fn left_partial_cluster(error: &Error) -> bool {
    matches!(
        error.root(),
        Error::Subprocess(_) | Error::ExhaustedRetries { .. } | Error::Io(_)
    )
}

fn print_report(report: &StartReport) {
    if output::is_json() {
        output::json_output(json!({
            "command": "start",
            "report": report,
        }));
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Cluster", output::highlight(&report.cluster));
    let origin = if report.config_synthesized {
        "created"
    } else {
        "existing"
    };
    output::field(
        "Config",
        format!(
            "{} {}",
            report.config_path.display(),
            output::muted(format!("({origin})"))
        ),
    );
    output::field("Workers", report.worker_concurrency);

    output::section("Containers");
    for container in &report.containers {
        output::field(
            &container.service,
            format!("{} {}", container.name, output::muted(short_id(&container.id))),
        );
    }
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}
