//! Dependency injection traits for testability
//!
//! This module provides trait abstractions for the external collaborators
//! of every command handler, allowing for easy mocking and testing.

use std::time::Instant;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::api_client::Client as ApiClient;
use crate::commands::connect::StoredSession;
use crate::config::{CliConfig, KEYRING_SERVICE, KEYRING_USER};
use crate::resources::{
    Certificate, Channel, DeploymentProcess, Environment, Feed, LibraryVariableSet, Machine,
    Project, ProjectGroup, ServerInfo, VariableSetResource,
};

/// The repository surface of the Drydock server. Commands depend on this
/// trait rather than the concrete HTTP client so tests can substitute a
/// mock collaborator and assert which calls were (or were not) made.
#[async_trait]
pub trait DeploymentClient: Send + Sync {
    async fn server_info(&self) -> Result<ServerInfo>;

    async fn list_projects(&self) -> Result<Vec<Project>>;
    async fn get_project(&self, id: &str) -> Result<Option<Project>>;
    async fn create_project(&self, project: &Project) -> Result<Project>;
    async fn update_project(&self, project: &Project) -> Result<Project>;
    async fn delete_project(&self, id: &str) -> Result<()>;

    async fn list_project_groups(&self) -> Result<Vec<ProjectGroup>>;
    async fn create_project_group(&self, group: &ProjectGroup) -> Result<ProjectGroup>;
    async fn delete_project_group(&self, id: &str) -> Result<()>;

    async fn list_environments(&self) -> Result<Vec<Environment>>;
    async fn get_environment(&self, id: &str) -> Result<Option<Environment>>;
    async fn create_environment(&self, environment: &Environment) -> Result<Environment>;
    async fn delete_environment(&self, id: &str) -> Result<()>;

    async fn list_machines(&self) -> Result<Vec<Machine>>;
    async fn delete_machine(&self, id: &str) -> Result<()>;

    async fn get_deployment_process(&self, id: &str) -> Result<DeploymentProcess>;
    async fn update_deployment_process(
        &self,
        process: &DeploymentProcess,
    ) -> Result<DeploymentProcess>;

    async fn get_variable_set(&self, id: &str) -> Result<VariableSetResource>;
    async fn update_variable_set(
        &self,
        variable_set: &VariableSetResource,
    ) -> Result<VariableSetResource>;

    async fn list_channels(&self, project_id: &str) -> Result<Vec<Channel>>;
    async fn create_channel(&self, channel: &Channel) -> Result<Channel>;

    async fn list_certificates(&self) -> Result<Vec<Certificate>>;
    async fn delete_certificate(&self, id: &str) -> Result<()>;

    async fn list_feeds(&self) -> Result<Vec<Feed>>;
    async fn delete_feed(&self, id: &str) -> Result<()>;

    async fn list_library_variable_sets(&self) -> Result<Vec<LibraryVariableSet>>;
    async fn create_library_variable_set(
        &self,
        set: &LibraryVariableSet,
    ) -> Result<LibraryVariableSet>;
    async fn delete_library_variable_set(&self, id: &str) -> Result<()>;
}

/// Time/clock operations
pub trait Clock: Send + Sync {
    /// Get current instant
    fn now(&self) -> Instant;
}

/// Persistent session storage (server address + API key).
pub trait SessionStore: Send + Sync {
    fn store(&self, session: &StoredSession) -> Result<()>;
    fn load(&self) -> Result<Option<StoredSession>>;
    fn clear(&self) -> Result<()>;
}

/// User interface operations
pub trait UserInterface: Send + Sync {
    /// Create a spinner progress indicator
    fn create_spinner(&self) -> Box<dyn ProgressIndicator>;

    /// Print a message
    fn print(&self, message: &str);

    /// Print a styled message
    fn print_styled(&self, message: &str, style: MessageStyle);

    /// Check if running in interactive mode
    fn is_interactive(&self) -> bool;

    /// Prompt for text input
    fn prompt_input(&self, prompt: &str, default: Option<&str>) -> Result<String>;
}

/// Progress indicator trait
pub trait ProgressIndicator: Send + Sync {
    fn set_message(&self, message: &str);
    fn finish_and_clear(&self);
}

/// Message styling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Bold,
    Cyan,
    Yellow,
    Warning,
    Error,
    Success,
}

// Production implementations

/// Production API client wrapper delegating to the typed HTTP client.
pub struct RealDeploymentClient {
    client: ApiClient,
}

impl RealDeploymentClient {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeploymentClient for RealDeploymentClient {
    async fn server_info(&self) -> Result<ServerInfo> {
        self.client.server_info().await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.client.list_projects().await
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        self.client.get_project(id).await
    }

    async fn create_project(&self, project: &Project) -> Result<Project> {
        self.client.create_project(project).await
    }

    async fn update_project(&self, project: &Project) -> Result<Project> {
        self.client.update_project(project).await
    }

    async fn delete_project(&self, id: &str) -> Result<()> {
        self.client.delete_project(id).await
    }

    async fn list_project_groups(&self) -> Result<Vec<ProjectGroup>> {
        self.client.list_project_groups().await
    }

    async fn create_project_group(&self, group: &ProjectGroup) -> Result<ProjectGroup> {
        self.client.create_project_group(group).await
    }

    async fn delete_project_group(&self, id: &str) -> Result<()> {
        self.client.delete_project_group(id).await
    }

    async fn list_environments(&self) -> Result<Vec<Environment>> {
        self.client.list_environments().await
    }

    async fn get_environment(&self, id: &str) -> Result<Option<Environment>> {
        self.client.get_environment(id).await
    }

    async fn create_environment(&self, environment: &Environment) -> Result<Environment> {
        self.client.create_environment(environment).await
    }

    async fn delete_environment(&self, id: &str) -> Result<()> {
        self.client.delete_environment(id).await
    }

    async fn list_machines(&self) -> Result<Vec<Machine>> {
        self.client.list_machines().await
    }

    async fn delete_machine(&self, id: &str) -> Result<()> {
        self.client.delete_machine(id).await
    }

    async fn get_deployment_process(&self, id: &str) -> Result<DeploymentProcess> {
        self.client.get_deployment_process(id).await
    }

    async fn update_deployment_process(
        &self,
        process: &DeploymentProcess,
    ) -> Result<DeploymentProcess> {
        self.client.update_deployment_process(process).await
    }

    async fn get_variable_set(&self, id: &str) -> Result<VariableSetResource> {
        self.client.get_variable_set(id).await
    }

    async fn update_variable_set(
        &self,
        variable_set: &VariableSetResource,
    ) -> Result<VariableSetResource> {
        self.client.update_variable_set(variable_set).await
    }

    async fn list_channels(&self, project_id: &str) -> Result<Vec<Channel>> {
        self.client.list_channels(project_id).await
    }

    async fn create_channel(&self, channel: &Channel) -> Result<Channel> {
        self.client.create_channel(channel).await
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>> {
        self.client.list_certificates().await
    }

    async fn delete_certificate(&self, id: &str) -> Result<()> {
        self.client.delete_certificate(id).await
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>> {
        self.client.list_feeds().await
    }

    async fn delete_feed(&self, id: &str) -> Result<()> {
        self.client.delete_feed(id).await
    }

    async fn list_library_variable_sets(&self) -> Result<Vec<LibraryVariableSet>> {
        self.client.list_library_variable_sets().await
    }

    async fn create_library_variable_set(
        &self,
        set: &LibraryVariableSet,
    ) -> Result<LibraryVariableSet> {
        self.client.create_library_variable_set(set).await
    }

    async fn delete_library_variable_set(&self, id: &str) -> Result<()> {
        self.client.delete_library_variable_set(id).await
    }
}

/// Production clock implementation
pub struct RealClock;

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Production session store: server address in the config file, API key in
/// the OS keyring. A session exists only when both halves are present.
pub struct RealSessionStore;

impl SessionStore for RealSessionStore {
    fn store(&self, session: &StoredSession) -> Result<()> {
        CliConfig::new(session.server_url.clone()).save()?;
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        entry.set_password(&session.api_key)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>> {
        let Some(config) = CliConfig::load()? else {
            return Ok(None);
        };

        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        match entry.get_password() {
            Ok(api_key) => Ok(Some(StoredSession {
                server_url: config.server_url,
                api_key,
            })),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(anyhow!("Failed to read stored API key: {}", e)),
        }
    }

    fn clear(&self) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        entry.delete_credential()?;
        Ok(())
    }
}
