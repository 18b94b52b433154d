//! Handlers for `compress`, `decompress` and `search`.
//!
//! Each runs one tool inside the cluster's execution container and relays
//! its output.

use serde_json::json;

use super::command::{CompressArgs, DecompressArgs, SearchArgs};
use super::context::Context;
use super::output;
use crate::adapter::outbound::docker::DockerCli;
use crate::application::Dispatcher;
use crate::error::Result;
use crate::port::ExecOutput;

/// Execute `compress`.
pub fn execute_compress(ctx: &Context, args: &CompressArgs) -> Result<()> {
    run(ctx, "compress", |dispatcher| dispatcher.compress(&args.paths))
}

/// Execute `decompress`.
pub fn execute_decompress(ctx: &Context, args: &DecompressArgs) -> Result<()> {
    run(ctx, "decompress", |dispatcher| {
        dispatcher.decompress(&args.paths, &args.extraction_dir)
    })
}

/// Execute `search`.
pub fn execute_search(ctx: &Context, args: &SearchArgs) -> Result<()> {
    run(ctx, "search", |dispatcher| {
        dispatcher.search(&args.query, args.file_path.as_deref())
    })
}

fn run<F>(ctx: &Context, command: &str, dispatch: F) -> Result<()>
where
    F: FnOnce(&Dispatcher<'_, DockerCli>) -> Result<ExecOutput>,
{
    let orchestrator = ctx.orchestrator();
    let config = orchestrator.runtime_config(&ctx.spec)?;
    let dispatcher = Dispatcher::new(orchestrator.runtime(), &config, orchestrator.layout());
    let result = dispatch(&dispatcher).map_err(|e| e.in_cluster(&ctx.spec.name))?;

    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "cluster": ctx.spec.name,
            "stdout": result.stdout,
            "stderr": result.stderr,
        }));
        return Ok(());
    }

    output::passthrough(&result.stdout);
    if !result.stderr.trim().is_empty() && output::verbosity() > 0 {
        eprint!("{}", result.stderr);
    }
    Ok(())
}
