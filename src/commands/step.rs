//! Deployment step commands.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::copy;
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::require_id;
use crate::selector::not_found_by_name;

pub struct StepDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

pub struct CopyStepConfig {
    pub project: String,
    pub source: String,
    /// Destination step name; defaults to "<source> - Copy".
    pub destination: Option<String>,
}

/// Duplicate a step within its project's deployment process. The clone is
/// appended after the existing steps and the process is saved once.
pub async fn copy_with_deps(config: CopyStepConfig, deps: &StepDependencies) -> Result<()> {
    let projects = deps.api.list_projects().await?;
    let Some(project) = projects.iter().find(|p| p.name == config.project) else {
        bail!(not_found_by_name("project", &config.project));
    };

    let mut process = deps
        .api
        .get_deployment_process(require_id(&project.deployment_process_id, "project")?)
        .await?;

    let Some(source) = process.steps.iter().find(|s| s.name == config.source) else {
        bail!(not_found_by_name("step", &config.source));
    };

    let mut clone = copy::clone_step(source);
    clone.name = copy::copy_name(&config.source, config.destination.as_deref());
    let clone_name = clone.name.clone();

    process.steps.push(clone);
    deps.api.update_deployment_process(&process).await?;

    deps.ui.print_styled(
        &format!("Copied step '{}' to '{clone_name}'.", config.source),
        MessageStyle::Success,
    );
    Ok(())
}
