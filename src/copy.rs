//! Structural deep-copy helpers for projects, channels and steps.
//!
//! Copies preserve structure and order but never carry the source `Id`,
//! `LastModifiedBy` or `LastModifiedOn` fields: the server assigns fresh
//! ids on save, which is what the variable scope remapping resolves
//! against. Sensitive variable values are stripped rather than copied.

use std::collections::BTreeMap;

use crate::resources::{
    Channel, ChannelRule, DeploymentAction, DeploymentProcess, DeploymentStep, Project, Variable,
};

/// The destination name for a copy: the explicit request, or the source
/// name with a `" - Copy"` suffix.
pub fn copy_name(source: &str, requested: Option<&str>) -> String {
    requested.map_or_else(|| format!("{source} - Copy"), str::to_string)
}

/// A new project carrying only the source's description. Everything else
/// (lifecycle, included library sets, deployment flags) starts from
/// defaults so the destination does not inherit references into the
/// source's configuration.
pub fn project_shell(source: &Project, name: &str, project_group_id: &str) -> Project {
    Project {
        id: None,
        name: name.to_string(),
        description: source.description.clone(),
        project_group_id: project_group_id.to_string(),
        lifecycle_id: None,
        default_to_skip_if_already_installed: false,
        included_library_variable_set_ids: Vec::new(),
        variable_set_id: None,
        deployment_process_id: None,
        last_modified_on: None,
        last_modified_by: None,
    }
}

pub fn clone_steps(process: &DeploymentProcess) -> Vec<DeploymentStep> {
    process.steps.iter().map(clone_step).collect()
}

pub fn clone_step(step: &DeploymentStep) -> DeploymentStep {
    DeploymentStep {
        id: None,
        name: step.name.clone(),
        properties: step.properties.clone(),
        actions: step.actions.iter().map(clone_action).collect(),
    }
}

fn clone_action(action: &DeploymentAction) -> DeploymentAction {
    DeploymentAction {
        id: None,
        name: action.name.clone(),
        action_type: action.action_type.clone(),
        environments: action.environments.clone(),
        properties: action.properties.clone(),
        sensitive_properties: action.sensitive_properties.clone(),
        is_disabled: action.is_disabled,
    }
}

/// A channel clone under a new name in the destination project. Never the
/// default channel, and with its own rule/tag collections; server-generated
/// links are left for the server to fill in.
pub fn clone_channel(source: &Channel, project_id: &str, requested_name: Option<&str>) -> Channel {
    Channel {
        id: None,
        name: copy_name(&source.name, requested_name),
        description: source.description.clone(),
        project_id: project_id.to_string(),
        lifecycle_id: source.lifecycle_id.clone(),
        is_default: false,
        rules: source.rules.iter().map(clone_rule).collect(),
        tenant_tags: source.tenant_tags.clone(),
        links: BTreeMap::new(),
        last_modified_on: None,
        last_modified_by: None,
    }
}

fn clone_rule(rule: &ChannelRule) -> ChannelRule {
    ChannelRule {
        id: None,
        version_range: rule.version_range.clone(),
        tag: rule.tag.clone(),
        actions: rule.actions.clone(),
    }
}

pub struct RemappedVariables {
    pub variables: Vec<Variable>,
    /// Names of sensitive variables whose values were stripped, one entry
    /// per affected variable.
    pub stripped: Vec<String>,
}

/// Copy a variable list for a new deployment process.
///
/// The `Action` scope dimension is remapped: each referenced source action
/// id is resolved to its action name, then to the destination action id
/// sharing that name. Scope entries whose action no longer exists in the
/// destination are dropped. Sensitive values are never copied: the value
/// is cleared and the sensitive flag reset.
pub fn remap_variables(
    source: &[Variable],
    source_process: &DeploymentProcess,
    dest_process: &DeploymentProcess,
) -> RemappedVariables {
    let source_names: BTreeMap<&str, &str> = action_ids_to_names(source_process);
    let dest_ids: BTreeMap<&str, &str> = action_names_to_ids(dest_process);

    let mut variables = Vec::with_capacity(source.len());
    let mut stripped = Vec::new();

    for variable in source {
        let mut copied = Variable {
            name: variable.name.clone(),
            value: variable.value.clone(),
            scope: variable.scope.clone(),
            is_sensitive: variable.is_sensitive,
        };

        copied.scope.action = variable
            .scope
            .action
            .iter()
            .filter_map(|old_id| {
                source_names
                    .get(old_id.as_str())
                    .and_then(|name| dest_ids.get(name))
                    .map(|new_id| (*new_id).to_string())
            })
            .collect();

        if copied.is_sensitive {
            copied.value = String::new();
            copied.is_sensitive = false;
            stripped.push(copied.name.clone());
        }

        variables.push(copied);
    }

    RemappedVariables {
        variables,
        stripped,
    }
}

fn action_ids_to_names(process: &DeploymentProcess) -> BTreeMap<&str, &str> {
    process
        .steps
        .iter()
        .flat_map(|step| &step.actions)
        .filter_map(|action| {
            action
                .id
                .as_deref()
                .map(|id| (id, action.name.as_str()))
        })
        .collect()
}

fn action_names_to_ids(process: &DeploymentProcess) -> BTreeMap<&str, &str> {
    process
        .steps
        .iter()
        .flat_map(|step| &step.actions)
        .filter_map(|action| {
            action
                .id
                .as_deref()
                .map(|id| (action.name.as_str(), id))
        })
        .collect()
}
