//! Resource models for the Drydock REST API.
//!
//! All resources are server-owned: this tool reads and writes them by
//! reference (id or unique name) and does not enforce their invariants.
//! Wire field names are PascalCase.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restricts where a variable value applies: scope dimension -> set of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScopeSpecification {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub machine: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub action: Vec<String>,
}

impl ScopeSpecification {
    pub fn is_empty(&self) -> bool {
        self.environment.is_empty()
            && self.role.is_empty()
            && self.machine.is_empty()
            && self.action.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Variable {
    pub name: String,
    pub value: String,
    pub scope: ScopeSpecification,
    pub is_sensitive: bool,
}

/// The variable collection owned by a project or library variable set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VariableSetResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub variables: Vec<Variable>,
    pub version: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub project_group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_id: Option<String>,
    pub default_to_skip_if_already_installed: bool,
    pub included_library_variable_set_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_set_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_process_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Environment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub use_guided_failure: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Machine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub roles: Vec<String>,
    pub environment_ids: Vec<String>,
    pub is_disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeploymentAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub action_type: String,
    pub environments: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub sensitive_properties: BTreeMap<String, String>,
    pub is_disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeploymentStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub properties: BTreeMap<String, String>,
    pub actions: Vec<DeploymentAction>,
}

/// Ordered list of steps defining how a project is deployed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeploymentProcess {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub project_id: String,
    pub steps: Vec<DeploymentStep>,
    pub version: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ChannelRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Channel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_id: Option<String>,
    pub is_default: bool,
    pub rules: Vec<ChannelRule>,
    pub tenant_tags: Vec<String>,
    pub links: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Certificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbprint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub feed_uri: String,
}

/// A named, reusable variable collection includable by multiple projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LibraryVariableSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_set_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServerInfo {
    pub application: String,
    pub version: String,
}

/// Server-returned resources always carry an id; surface a descriptive
/// error instead of panicking when one is unexpectedly absent.
pub fn require_id<'a>(id: &'a Option<String>, kind: &str) -> Result<&'a str> {
    id.as_deref()
        .ok_or_else(|| anyhow!("the {kind} resource has no id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_pascal_case() {
        let json = serde_json::to_value(Project {
            name: "Website".to_string(),
            project_group_id: "projectgroups-1".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(json["Name"], "Website");
        assert_eq!(json["ProjectGroupId"], "projectgroups-1");
        assert_eq!(json["DefaultToSkipIfAlreadyInstalled"], false);
        // Absent optional fields are omitted from the payload entirely
        assert!(json.get("Id").is_none());
        assert!(json.get("LifecycleId").is_none());
    }

    #[test]
    fn test_deserialize_ignores_missing_fields() {
        let variable: Variable =
            serde_json::from_str(r#"{"Name":"ConnectionString","Value":"db"}"#).unwrap();
        assert_eq!(variable.name, "ConnectionString");
        assert!(!variable.is_sensitive);
        assert!(variable.scope.is_empty());
    }

    #[test]
    fn test_empty_scope_dimensions_are_omitted() {
        let scope = ScopeSpecification {
            environment: vec!["environments-1".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(json["Environment"][0], "environments-1");
        assert!(json.get("Action").is_none());
    }

    #[test]
    fn test_require_id() {
        assert_eq!(
            require_id(&Some("projects-1".to_string()), "project").unwrap(),
            "projects-1"
        );
        let err = require_id(&None, "project").unwrap_err();
        assert!(err.to_string().contains("has no id"));
    }
}
