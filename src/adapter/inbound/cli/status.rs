//! Handler for the `status` command.

use serde_json::json;
use tabled::{Table, Tabled};

use super::context::Context;
use super::output;
use crate::domain::membership::ClusterMembership;
use crate::error::Result;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Container")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Execute the status command.
pub fn execute(ctx: &Context) -> Result<()> {
    let cluster = ctx.spec.name.as_str();
    let membership = ctx.orchestrator().status(cluster)?;

    if output::is_json() {
        let members = membership.as_ref().map(|m| {
            m.members()
                .iter()
                .map(|member| json!({ "id": member.id, "name": member.name }))
                .collect::<Vec<_>>()
        });
        output::json_output(json!({
            "command": "status",
            "cluster": cluster,
            "running": membership.is_some(),
            "members": members,
        }));
        return Ok(());
    }

    output::field("Cluster", output::highlight(cluster));
    match membership {
        None => output::field("Status", "not running"),
        Some(membership) if membership.is_empty() => {
            output::field("Status", "network exists, no containers attached");
        }
        Some(membership) => {
            output::field("Status", format!("{} containers", membership.len()));
            println!();
            println!("{}", render_table(&membership));
        }
    }
    Ok(())
}

fn render_table(membership: &ClusterMembership) -> String {
    let rows = membership.members().iter().map(|member| MemberRow {
        name: member.name.clone(),
        id: member.id.chars().take(12).collect(),
    });
    Table::new(rows).to_string()
}
