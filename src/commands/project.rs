//! Project management commands, including the project deep copy.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::cache::ListCache;
use crate::commands::OutputFormat;
use crate::copy;
use crate::deps::{Clock, DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, Project};
use crate::selector::{not_found_by_id, not_found_by_name, Selector};

pub struct ProjectDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
    pub clock: Arc<dyn Clock>,
}

pub async fn list_with_deps(format: OutputFormat, deps: &ProjectDependencies) -> Result<()> {
    let projects = deps.api.list_projects().await?;
    render(&projects, format, deps);
    Ok(())
}

pub async fn get_with_deps(
    selector: &Selector,
    format: OutputFormat,
    deps: &ProjectDependencies,
) -> Result<()> {
    let mut matched = Vec::new();

    match selector {
        Selector::All => {
            matched = deps.api.list_projects().await?;
        }
        Selector::ByName(names) => {
            let mut cache = ListCache::new();
            for name in names {
                let now = deps.clock.now();
                if cache.is_expired(now) {
                    cache.set(deps.api.list_projects().await?, now);
                }
                let projects = cache.fresh(now).unwrap_or(&[]);
                match projects.iter().find(|p| p.name == *name) {
                    Some(project) => matched.push(project.clone()),
                    None => deps
                        .ui
                        .print_styled(&not_found_by_name("project", name), MessageStyle::Warning),
                }
            }
        }
        Selector::ById(ids) => {
            for id in ids {
                match deps.api.get_project(id).await? {
                    Some(project) => matched.push(project),
                    None => deps
                        .ui
                        .print_styled(&not_found_by_id("project", id), MessageStyle::Warning),
                }
            }
        }
    }

    render(&matched, format, deps);
    Ok(())
}

pub struct CreateProjectConfig {
    pub name: String,
    pub group: String,
    pub description: Option<String>,
    pub lifecycle_id: Option<String>,
}

pub async fn create_with_deps(
    config: CreateProjectConfig,
    deps: &ProjectDependencies,
) -> Result<()> {
    let groups = deps.api.list_project_groups().await?;
    let Some(group) = groups.iter().find(|g| g.name == config.group) else {
        bail!(not_found_by_name("project group", &config.group));
    };

    let project = Project {
        name: config.name,
        description: config.description.unwrap_or_default(),
        project_group_id: require_id(&group.id, "project group")?.to_string(),
        lifecycle_id: config.lifecycle_id,
        ..Default::default()
    };

    let created = deps.api.create_project(&project).await?;
    deps.ui.print_styled(
        &format!("Created project '{}'.", created.name),
        MessageStyle::Success,
    );
    render(std::slice::from_ref(&created), OutputFormat::Table, deps);
    Ok(())
}

pub struct UpdateProjectConfig {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn update_with_deps(
    config: UpdateProjectConfig,
    deps: &ProjectDependencies,
) -> Result<()> {
    let Some(mut project) = deps.api.get_project(&config.id).await? else {
        deps.ui
            .print_styled(&not_found_by_id("project", &config.id), MessageStyle::Warning);
        return Ok(());
    };

    if let Some(name) = config.name {
        project.name = name;
    }
    if let Some(description) = config.description {
        project.description = description;
    }

    let updated = deps.api.update_project(&project).await?;
    deps.ui.print_styled(
        &format!("Updated project '{}'.", updated.name),
        MessageStyle::Success,
    );
    Ok(())
}

pub async fn delete_with_deps(
    selector: &Selector,
    force: bool,
    deps: &ProjectDependencies,
) -> Result<()> {
    let mut targets: Vec<Project> = Vec::new();

    match selector {
        Selector::All => bail!("either --name or --id must be supplied"),
        Selector::ByName(names) => {
            let mut cache = ListCache::new();
            for name in names {
                let now = deps.clock.now();
                if cache.is_expired(now) {
                    cache.set(deps.api.list_projects().await?, now);
                }
                let projects = cache.fresh(now).unwrap_or(&[]);
                match projects.iter().find(|p| p.name == *name) {
                    Some(project) => targets.push(project.clone()),
                    None => deps
                        .ui
                        .print_styled(&not_found_by_name("project", name), MessageStyle::Warning),
                }
            }
        }
        Selector::ById(ids) => {
            for id in ids {
                match deps.api.get_project(id).await? {
                    Some(project) => targets.push(project),
                    None => deps
                        .ui
                        .print_styled(&not_found_by_id("project", id), MessageStyle::Warning),
                }
            }
        }
    }

    for project in targets {
        if !force && deps.ui.is_interactive() {
            let answer = deps
                .ui
                .prompt_input(&format!("Type '{}' to confirm deletion", project.name), None)?;
            if answer != project.name {
                deps.ui
                    .print_styled("Deletion cancelled.", MessageStyle::Yellow);
                continue;
            }
        }

        deps.api
            .delete_project(require_id(&project.id, "project")?)
            .await?;
        deps.ui.print_styled(
            &format!("Deleted project '{}'.", project.name),
            MessageStyle::Success,
        );
    }

    Ok(())
}

pub struct CopyProjectConfig {
    pub source: String,
    pub destination: String,
    pub group: String,
}

/// Copy a project's deployment process and variable set under a new name.
///
/// The destination shell is created first so the scope remapping has
/// server-assigned action ids to resolve against. The process and the
/// variable set are each saved exactly once; if the variable-set save
/// fails after the process save succeeded the two are left inconsistent,
/// matching the server's own behavior.
pub async fn copy_with_deps(config: CopyProjectConfig, deps: &ProjectDependencies) -> Result<()> {
    let projects = deps.api.list_projects().await?;
    let Some(source) = projects.iter().find(|p| p.name == config.source) else {
        bail!(not_found_by_name("project", &config.source));
    };

    let groups = deps.api.list_project_groups().await?;
    let Some(group) = groups.iter().find(|g| g.name == config.group) else {
        bail!(not_found_by_name("project group", &config.group));
    };

    let shell = copy::project_shell(
        source,
        &config.destination,
        require_id(&group.id, "project group")?,
    );
    let created = deps.api.create_project(&shell).await?;
    tracing::debug!(project = %created.name, "created destination project shell");

    // Deployment process: clone the source steps into the destination's
    // (empty) process and save once.
    let source_process = deps
        .api
        .get_deployment_process(require_id(&source.deployment_process_id, "project")?)
        .await?;
    let mut dest_process = deps
        .api
        .get_deployment_process(require_id(&created.deployment_process_id, "project")?)
        .await?;
    dest_process.steps = copy::clone_steps(&source_process);
    let dest_process = deps.api.update_deployment_process(&dest_process).await?;

    // Variables: remap action scopes against the freshly saved process and
    // save once. Sensitive values are never copied.
    let source_variables = deps
        .api
        .get_variable_set(require_id(&source.variable_set_id, "project")?)
        .await?;
    let mut dest_variables = deps
        .api
        .get_variable_set(require_id(&created.variable_set_id, "project")?)
        .await?;

    let remapped = copy::remap_variables(
        &source_variables.variables,
        &source_process,
        &dest_process,
    );
    for name in &remapped.stripped {
        deps.ui.print_styled(
            &format!("The variable '{name}' is sensitive; its value was not copied."),
            MessageStyle::Warning,
        );
    }
    dest_variables.variables = remapped.variables;
    deps.api.update_variable_set(&dest_variables).await?;

    deps.ui.print_styled(
        &format!(
            "Copied project '{}' to '{}'.",
            config.source, config.destination
        ),
        MessageStyle::Success,
    );
    Ok(())
}

fn render(projects: &[Project], format: OutputFormat, deps: &ProjectDependencies) {
    if projects.is_empty() {
        deps.ui
            .print_styled("No projects found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(projects) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for project in projects {
                deps.ui.print_styled(&project.name, MessageStyle::Bold);
                deps.ui
                    .print(&format!("  Id:    {}", project.id.as_deref().unwrap_or("-")));
                deps.ui
                    .print(&format!("  Group: {}", project.project_group_id));
                if !project.description.is_empty() {
                    deps.ui.print(&format!("  About: {}", project.description));
                }
            }
            deps.ui.print("");
            deps.ui
                .print(&format!("Total: {} projects", projects.len()));
        }
    }
}
