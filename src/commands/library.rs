//! Library variable set commands.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::commands::{select_from, OutputFormat};
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, LibraryVariableSet};
use crate::selector::Selector;

pub struct LibraryDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

pub async fn list_with_deps(
    selector: &Selector,
    format: OutputFormat,
    deps: &LibraryDependencies,
) -> Result<()> {
    let sets = deps.api.list_library_variable_sets().await?;
    let matched = select_from(
        &sets,
        selector,
        "library variable set",
        |s| &s.name,
        |s| s.id.as_deref(),
        deps.ui.as_ref(),
    );
    render(&matched, format, deps);
    Ok(())
}

pub struct CreateLibraryConfig {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_with_deps(config: CreateLibraryConfig, deps: &LibraryDependencies) -> Result<()> {
    let set = LibraryVariableSet {
        id: None,
        name: config.name,
        description: config.description.unwrap_or_default(),
        variable_set_id: None,
    };

    let created = deps.api.create_library_variable_set(&set).await?;
    deps.ui.print_styled(
        &format!("Created library variable set '{}'.", created.name),
        MessageStyle::Success,
    );
    Ok(())
}

pub async fn delete_with_deps(selector: &Selector, deps: &LibraryDependencies) -> Result<()> {
    if matches!(selector, Selector::All) {
        bail!("either --name or --id must be supplied");
    }

    let sets = deps.api.list_library_variable_sets().await?;
    let targets = select_from(
        &sets,
        selector,
        "library variable set",
        |s| &s.name,
        |s| s.id.as_deref(),
        deps.ui.as_ref(),
    );

    for set in targets {
        deps.api
            .delete_library_variable_set(require_id(&set.id, "library variable set")?)
            .await?;
        deps.ui.print_styled(
            &format!("Deleted library variable set '{}'.", set.name),
            MessageStyle::Success,
        );
    }

    Ok(())
}

fn render(sets: &[LibraryVariableSet], format: OutputFormat, deps: &LibraryDependencies) {
    if sets.is_empty() {
        deps.ui
            .print_styled("No library variable sets found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(sets) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for set in sets {
                deps.ui.print_styled(&set.name, MessageStyle::Bold);
                deps.ui
                    .print(&format!("  Id: {}", set.id.as_deref().unwrap_or("-")));
                if !set.description.is_empty() {
                    deps.ui.print(&format!("  About: {}", set.description));
                }
            }
        }
    }
}
