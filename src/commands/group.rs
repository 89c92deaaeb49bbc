//! Project group commands.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::commands::{select_from, OutputFormat};
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, ProjectGroup};
use crate::selector::Selector;

pub struct GroupDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

pub async fn list_with_deps(
    selector: &Selector,
    format: OutputFormat,
    deps: &GroupDependencies,
) -> Result<()> {
    let groups = deps.api.list_project_groups().await?;
    let matched = select_from(
        &groups,
        selector,
        "project group",
        |g| &g.name,
        |g| g.id.as_deref(),
        deps.ui.as_ref(),
    );
    render(&matched, format, deps);
    Ok(())
}

pub struct CreateGroupConfig {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_with_deps(config: CreateGroupConfig, deps: &GroupDependencies) -> Result<()> {
    let group = ProjectGroup {
        id: None,
        name: config.name,
        description: config.description.unwrap_or_default(),
    };

    let created = deps.api.create_project_group(&group).await?;
    deps.ui.print_styled(
        &format!("Created project group '{}'.", created.name),
        MessageStyle::Success,
    );
    Ok(())
}

pub async fn delete_with_deps(selector: &Selector, deps: &GroupDependencies) -> Result<()> {
    if matches!(selector, Selector::All) {
        bail!("either --name or --id must be supplied");
    }

    let groups = deps.api.list_project_groups().await?;
    let targets = select_from(
        &groups,
        selector,
        "project group",
        |g| &g.name,
        |g| g.id.as_deref(),
        deps.ui.as_ref(),
    );

    for group in targets {
        deps.api
            .delete_project_group(require_id(&group.id, "project group")?)
            .await?;
        deps.ui.print_styled(
            &format!("Deleted project group '{}'.", group.name),
            MessageStyle::Success,
        );
    }

    Ok(())
}

fn render(groups: &[ProjectGroup], format: OutputFormat, deps: &GroupDependencies) {
    if groups.is_empty() {
        deps.ui
            .print_styled("No project groups found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(groups) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for group in groups {
                deps.ui.print_styled(&group.name, MessageStyle::Bold);
                deps.ui
                    .print(&format!("  Id: {}", group.id.as_deref().unwrap_or("-")));
                if !group.description.is_empty() {
                    deps.ui.print(&format!("  About: {}", group.description));
                }
            }
        }
    }
}
