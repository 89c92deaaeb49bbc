//! Environment commands.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::commands::{select_from, OutputFormat};
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, Environment};
use crate::selector::{not_found_by_id, Selector};

pub struct EnvironmentDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

pub async fn list_with_deps(
    selector: &Selector,
    format: OutputFormat,
    deps: &EnvironmentDependencies,
) -> Result<()> {
    let matched = resolve(selector, deps).await?;
    render(&matched, format, deps);
    Ok(())
}

pub struct CreateEnvironmentConfig {
    pub name: String,
    pub description: Option<String>,
    pub use_guided_failure: bool,
}

pub async fn create_with_deps(
    config: CreateEnvironmentConfig,
    deps: &EnvironmentDependencies,
) -> Result<()> {
    let environment = Environment {
        id: None,
        name: config.name,
        description: config.description.unwrap_or_default(),
        use_guided_failure: config.use_guided_failure,
    };

    let created = deps.api.create_environment(&environment).await?;
    deps.ui.print_styled(
        &format!("Created environment '{}'.", created.name),
        MessageStyle::Success,
    );
    Ok(())
}

pub async fn delete_with_deps(
    selector: &Selector,
    deps: &EnvironmentDependencies,
) -> Result<()> {
    if matches!(selector, Selector::All) {
        bail!("either --name or --id must be supplied");
    }

    for environment in resolve(selector, deps).await? {
        deps.api
            .delete_environment(require_id(&environment.id, "environment")?)
            .await?;
        deps.ui.print_styled(
            &format!("Deleted environment '{}'.", environment.name),
            MessageStyle::Success,
        );
    }

    Ok(())
}

// Id lookups go straight to the single-resource endpoint; name lookups
// resolve against the full list.
async fn resolve(
    selector: &Selector,
    deps: &EnvironmentDependencies,
) -> Result<Vec<Environment>> {
    if let Selector::ById(ids) = selector {
        let mut matched = Vec::new();
        for id in ids {
            match deps.api.get_environment(id).await? {
                Some(environment) => matched.push(environment),
                None => deps
                    .ui
                    .print_styled(&not_found_by_id("environment", id), MessageStyle::Warning),
            }
        }
        return Ok(matched);
    }

    let environments = deps.api.list_environments().await?;
    Ok(select_from(
        &environments,
        selector,
        "environment",
        |e| &e.name,
        |e| e.id.as_deref(),
        deps.ui.as_ref(),
    ))
}

fn render(environments: &[Environment], format: OutputFormat, deps: &EnvironmentDependencies) {
    if environments.is_empty() {
        deps.ui
            .print_styled("No environments found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(environments) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for environment in environments {
                deps.ui
                    .print_styled(&environment.name, MessageStyle::Bold);
                deps.ui.print(&format!(
                    "  Id: {}",
                    environment.id.as_deref().unwrap_or("-")
                ));
                if environment.use_guided_failure {
                    deps.ui.print("  Guided failure: on");
                }
            }
        }
    }
}
