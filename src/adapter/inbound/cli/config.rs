//! Handler for the `config` command group.

use serde_json::json;

use super::context::Context;
use super::output;
use crate::error::Result;

/// Execute `config show`.
///
/// Reads the persisted runtime config of an initialized cluster and prints
/// it with passwords masked. Nothing is synthesized here.
pub fn execute_show(ctx: &Context) -> Result<()> {
    let orchestrator = ctx.orchestrator();
    let config = orchestrator.runtime_config(&ctx.spec)?.masked();
    let path = orchestrator.store(&ctx.spec.name).path().display().to_string();

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "path": path,
            "config": serde_json::to_value(&config)?,
        }));
        return Ok(());
    }

    output::note(&format!("# {path}"));
    output::passthrough(&config.to_toml()?);
    Ok(())
}
