//! Project variable commands.
//!
//! Add and remove operate in batch: every requested change is applied to
//! the in-memory variable set first and the set is saved at most once.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::commands::OutputFormat;
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, Project, Variable, VariableSetResource};
use crate::selector::{not_found_by_name, Selector};

pub struct VariableDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

/// A `NAME=VALUE` pair from the command line. Parsing happens before any
/// network call so a malformed spec never leaves partial changes behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpec {
    pub name: String,
    pub value: String,
}

impl VariableSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let Some((name, value)) = spec.split_once('=') else {
            bail!("invalid variable '{spec}': expected NAME=VALUE");
        };
        if name.is_empty() {
            bail!("invalid variable '{spec}': the name must not be empty");
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

pub async fn list_with_deps(
    project: &str,
    selector: &Selector,
    format: OutputFormat,
    deps: &VariableDependencies,
) -> Result<()> {
    let (_, variable_set) = load_variable_set(project, deps).await?;

    let variables: Vec<&Variable> = match selector {
        Selector::All => variable_set.variables.iter().collect(),
        Selector::ByName(names) => names
            .iter()
            .filter_map(|name| {
                let found = variable_set.variables.iter().find(|v| v.name == *name);
                if found.is_none() {
                    deps.ui
                        .print_styled(&not_found_by_name("variable", name), MessageStyle::Warning);
                }
                found
            })
            .collect(),
        Selector::ById(_) => bail!("variables are addressed by name, not by id"),
    };

    render(&variables, format, deps);
    Ok(())
}

pub struct AddVariablesConfig {
    pub project: String,
    pub specs: Vec<String>,
    pub sensitive: bool,
    pub environments: Vec<String>,
}

pub async fn add_with_deps(config: AddVariablesConfig, deps: &VariableDependencies) -> Result<()> {
    // All parsing failures are fatal before the first request goes out.
    let specs = config
        .specs
        .iter()
        .map(|s| VariableSpec::parse(s))
        .collect::<Result<Vec<_>>>()?;

    let environment_ids = resolve_environments(&config.environments, deps).await?;
    let (_, mut variable_set) = load_variable_set(&config.project, deps).await?;

    let added = specs.len();
    for spec in specs {
        let mut variable = Variable {
            name: spec.name,
            value: spec.value,
            is_sensitive: config.sensitive,
            ..Default::default()
        };
        variable.scope.environment = environment_ids.clone();
        variable_set.variables.push(variable);
    }

    deps.api.update_variable_set(&variable_set).await?;
    deps.ui.print_styled(
        &format!(
            "Added {added} variable{} to '{}'.",
            if added == 1 { "" } else { "s" },
            config.project
        ),
        MessageStyle::Success,
    );
    Ok(())
}

pub struct RemoveVariablesConfig {
    pub project: String,
    pub names: Vec<String>,
}

pub async fn remove_with_deps(
    config: RemoveVariablesConfig,
    deps: &VariableDependencies,
) -> Result<()> {
    let (_, mut variable_set) = load_variable_set(&config.project, deps).await?;

    let mut removed = 0;
    for name in &config.names {
        let before = variable_set.variables.len();
        variable_set.variables.retain(|v| v.name != *name);
        if variable_set.variables.len() == before {
            deps.ui
                .print_styled(&not_found_by_name("variable", name), MessageStyle::Warning);
        } else {
            removed += before - variable_set.variables.len();
        }
    }

    // Nothing matched: the set is untouched, so there is nothing to save.
    if removed == 0 {
        return Ok(());
    }

    deps.api.update_variable_set(&variable_set).await?;
    deps.ui.print_styled(
        &format!(
            "Removed {removed} variable{} from '{}'.",
            if removed == 1 { "" } else { "s" },
            config.project
        ),
        MessageStyle::Success,
    );
    Ok(())
}

/// Resolve a project by name and fetch its variable set. A missing project
/// is fatal: variable operations have no meaningful partial result.
async fn load_variable_set(
    project_name: &str,
    deps: &VariableDependencies,
) -> Result<(Project, VariableSetResource)> {
    let projects = deps.api.list_projects().await?;
    let Some(project) = projects.into_iter().find(|p| p.name == project_name) else {
        bail!(not_found_by_name("project", project_name));
    };

    let variable_set = deps
        .api
        .get_variable_set(require_id(&project.variable_set_id, "project")?)
        .await?;
    Ok((project, variable_set))
}

async fn resolve_environments(
    names: &[String],
    deps: &VariableDependencies,
) -> Result<Vec<String>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let environments = deps.api.list_environments().await?;
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let Some(environment) = environments.iter().find(|e| e.name == *name) else {
            bail!(not_found_by_name("environment", name));
        };
        ids.push(require_id(&environment.id, "environment")?.to_string());
    }
    Ok(ids)
}

fn render(variables: &[&Variable], format: OutputFormat, deps: &VariableDependencies) {
    if variables.is_empty() {
        deps.ui
            .print_styled("No variables found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(variables) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for variable in variables {
                deps.ui.print_styled(&variable.name, MessageStyle::Bold);
                if variable.is_sensitive {
                    deps.ui.print("  Value: ********");
                } else {
                    deps.ui.print(&format!("  Value: {}", variable.value));
                }
                if !variable.scope.is_empty() {
                    deps.ui.print("  Scoped");
                }
            }
        }
    }
}
