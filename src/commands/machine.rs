//! Deployment target (machine) commands.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::commands::{select_from, OutputFormat};
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, Machine};
use crate::selector::Selector;

pub struct MachineDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

pub async fn list_with_deps(
    selector: &Selector,
    format: OutputFormat,
    deps: &MachineDependencies,
) -> Result<()> {
    let machines = deps.api.list_machines().await?;
    let matched = select_from(
        &machines,
        selector,
        "machine",
        |m| &m.name,
        |m| m.id.as_deref(),
        deps.ui.as_ref(),
    );
    render(&matched, format, deps);
    Ok(())
}

pub async fn delete_with_deps(selector: &Selector, deps: &MachineDependencies) -> Result<()> {
    if matches!(selector, Selector::All) {
        bail!("either --name or --id must be supplied");
    }

    let machines = deps.api.list_machines().await?;
    let targets = select_from(
        &machines,
        selector,
        "machine",
        |m| &m.name,
        |m| m.id.as_deref(),
        deps.ui.as_ref(),
    );

    for machine in targets {
        deps.api
            .delete_machine(require_id(&machine.id, "machine")?)
            .await?;
        deps.ui.print_styled(
            &format!("Deleted machine '{}'.", machine.name),
            MessageStyle::Success,
        );
    }

    Ok(())
}

fn render(machines: &[Machine], format: OutputFormat, deps: &MachineDependencies) {
    if machines.is_empty() {
        deps.ui
            .print_styled("No machines found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(machines) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for machine in machines {
                deps.ui.print_styled(&machine.name, MessageStyle::Bold);
                deps.ui
                    .print(&format!("  Id:    {}", machine.id.as_deref().unwrap_or("-")));
                deps.ui
                    .print(&format!("  Roles: {}", machine.roles.join(", ")));
                if machine.is_disabled {
                    deps.ui.print_styled("  Disabled", MessageStyle::Yellow);
                }
            }
        }
    }
}
