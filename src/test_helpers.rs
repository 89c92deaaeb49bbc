//! Shared test helpers.
//!
//! `MockDeploymentClient` is a stateful in-memory stand-in for the server:
//! it records every call it receives so tests can assert not only on
//! results but on which requests were (or were not) made, and it assigns
//! server-style ids on create/save the way the real API does.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use mockall::mock;

use crate::commands::connect::StoredSession;
use crate::deps::{Clock, DeploymentClient, SessionStore};
use crate::resources::{
    Certificate, Channel, DeploymentProcess, Environment, Feed, LibraryVariableSet, Machine,
    Project, ProjectGroup, ServerInfo, VariableSetResource,
};

mock! {
    pub SessionStore {}

    impl SessionStore for SessionStore {
        fn store(&self, session: &StoredSession) -> Result<()>;
        fn load(&self) -> Result<Option<StoredSession>>;
        fn clear(&self) -> Result<()>;
    }
}

/// A clock pinned to the instant it was created.
pub struct FixedClock {
    instant: Instant,
}

impl FixedClock {
    pub fn new() -> Self {
        Self {
            instant: Instant::now(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.instant
    }
}

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    groups: Vec<ProjectGroup>,
    environments: Vec<Environment>,
    machines: Vec<Machine>,
    certificates: Vec<Certificate>,
    feeds: Vec<Feed>,
    library_sets: Vec<LibraryVariableSet>,
    processes: HashMap<String, DeploymentProcess>,
    variable_sets: HashMap<String, VariableSetResource>,
    channels: Vec<Channel>,
    calls: Vec<String>,
    next_id: u32,
    failure: Option<String>,
}

#[derive(Default)]
pub struct MockDeploymentClient {
    state: Mutex<State>,
}

impl MockDeploymentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails with this message.
    pub fn with_failure(self, message: &str) -> Self {
        self.state.lock().unwrap().failure = Some(message.to_string());
        self
    }

    pub fn with_project(self, project: Project) -> Self {
        self.state.lock().unwrap().projects.push(project);
        self
    }

    pub fn with_group(self, group: ProjectGroup) -> Self {
        self.state.lock().unwrap().groups.push(group);
        self
    }

    pub fn with_environment(self, environment: Environment) -> Self {
        self.state.lock().unwrap().environments.push(environment);
        self
    }

    pub fn with_machine(self, machine: Machine) -> Self {
        self.state.lock().unwrap().machines.push(machine);
        self
    }

    pub fn with_certificate(self, certificate: Certificate) -> Self {
        self.state.lock().unwrap().certificates.push(certificate);
        self
    }

    pub fn with_feed(self, feed: Feed) -> Self {
        self.state.lock().unwrap().feeds.push(feed);
        self
    }

    pub fn with_library_set(self, set: LibraryVariableSet) -> Self {
        self.state.lock().unwrap().library_sets.push(set);
        self
    }

    pub fn with_process(self, process: DeploymentProcess) -> Self {
        let mut state = self.state.lock().unwrap();
        if let Some(id) = process.id.clone() {
            state.processes.insert(id, process);
        }
        drop(state);
        self
    }

    pub fn with_variable_set(self, set: VariableSetResource) -> Self {
        let mut state = self.state.lock().unwrap();
        if let Some(id) = set.id.clone() {
            state.variable_sets.insert(id, set);
        }
        drop(state);
        self
    }

    pub fn with_channel(self, channel: Channel) -> Self {
        self.state.lock().unwrap().channels.push(channel);
        self
    }

    /// Every call made so far, in order, as "method" or "method:argument".
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.split(':').next() == Some(method))
            .count()
    }

    pub fn project_named(&self, name: &str) -> Option<Project> {
        self.state
            .lock()
            .unwrap()
            .projects
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    pub fn stored_process(&self, id: &str) -> Option<DeploymentProcess> {
        self.state.lock().unwrap().processes.get(id).cloned()
    }

    pub fn stored_variable_set(&self, id: &str) -> Option<VariableSetResource> {
        self.state.lock().unwrap().variable_sets.get(id).cloned()
    }

    pub fn stored_channels(&self) -> Vec<Channel> {
        self.state.lock().unwrap().channels.clone()
    }

    fn record(&self, call: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        match &state.failure {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

// Assigned ids start above any id a fixture would use, so created
// resources never collide with seeded ones.
fn next(state: &mut State) -> u32 {
    state.next_id += 1;
    state.next_id + 100
}

#[async_trait]
impl DeploymentClient for MockDeploymentClient {
    async fn server_info(&self) -> Result<ServerInfo> {
        self.record("server_info")?;
        Ok(ServerInfo {
            application: "Drydock".to_string(),
            version: "4.1.0".to_string(),
        })
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.record("list_projects")?;
        Ok(self.state.lock().unwrap().projects.clone())
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        self.record(&format!("get_project:{id}"))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .projects
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .cloned())
    }

    async fn create_project(&self, project: &Project) -> Result<Project> {
        self.record(&format!("create_project:{}", project.name))?;
        let mut state = self.state.lock().unwrap();
        let n = next(&mut state);

        let process_id = format!("deploymentprocesses-{n}");
        let variable_set_id = format!("variablesets-{n}");
        let mut created = project.clone();
        created.id = Some(format!("projects-{n}"));
        created.deployment_process_id = Some(process_id.clone());
        created.variable_set_id = Some(variable_set_id.clone());

        state.processes.insert(
            process_id.clone(),
            DeploymentProcess {
                id: Some(process_id),
                project_id: created.id.clone().unwrap_or_default(),
                steps: Vec::new(),
                version: 0,
            },
        );
        state.variable_sets.insert(
            variable_set_id.clone(),
            VariableSetResource {
                id: Some(variable_set_id),
                owner_id: created.id.clone().unwrap_or_default(),
                variables: Vec::new(),
                version: 0,
            },
        );

        state.projects.push(created.clone());
        Ok(created)
    }

    async fn update_project(&self, project: &Project) -> Result<Project> {
        self.record(&format!(
            "update_project:{}",
            project.id.as_deref().unwrap_or("")
        ))?;
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
        {
            *existing = project.clone();
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, id: &str) -> Result<()> {
        self.record(&format!("delete_project:{id}"))?;
        self.state
            .lock()
            .unwrap()
            .projects
            .retain(|p| p.id.as_deref() != Some(id));
        Ok(())
    }

    async fn list_project_groups(&self) -> Result<Vec<ProjectGroup>> {
        self.record("list_project_groups")?;
        Ok(self.state.lock().unwrap().groups.clone())
    }

    async fn create_project_group(&self, group: &ProjectGroup) -> Result<ProjectGroup> {
        self.record(&format!("create_project_group:{}", group.name))?;
        let mut state = self.state.lock().unwrap();
        let n = next(&mut state);
        let mut created = group.clone();
        created.id = Some(format!("projectgroups-{n}"));
        state.groups.push(created.clone());
        Ok(created)
    }

    async fn delete_project_group(&self, id: &str) -> Result<()> {
        self.record(&format!("delete_project_group:{id}"))?;
        self.state
            .lock()
            .unwrap()
            .groups
            .retain(|g| g.id.as_deref() != Some(id));
        Ok(())
    }

    async fn list_environments(&self) -> Result<Vec<Environment>> {
        self.record("list_environments")?;
        Ok(self.state.lock().unwrap().environments.clone())
    }

    async fn get_environment(&self, id: &str) -> Result<Option<Environment>> {
        self.record(&format!("get_environment:{id}"))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .environments
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .cloned())
    }

    async fn create_environment(&self, environment: &Environment) -> Result<Environment> {
        self.record(&format!("create_environment:{}", environment.name))?;
        let mut state = self.state.lock().unwrap();
        let n = next(&mut state);
        let mut created = environment.clone();
        created.id = Some(format!("environments-{n}"));
        state.environments.push(created.clone());
        Ok(created)
    }

    async fn delete_environment(&self, id: &str) -> Result<()> {
        self.record(&format!("delete_environment:{id}"))?;
        self.state
            .lock()
            .unwrap()
            .environments
            .retain(|e| e.id.as_deref() != Some(id));
        Ok(())
    }

    async fn list_machines(&self) -> Result<Vec<Machine>> {
        self.record("list_machines")?;
        Ok(self.state.lock().unwrap().machines.clone())
    }

    async fn delete_machine(&self, id: &str) -> Result<()> {
        self.record(&format!("delete_machine:{id}"))?;
        self.state
            .lock()
            .unwrap()
            .machines
            .retain(|m| m.id.as_deref() != Some(id));
        Ok(())
    }

    async fn get_deployment_process(&self, id: &str) -> Result<DeploymentProcess> {
        self.record(&format!("get_deployment_process:{id}"))?;
        match self.state.lock().unwrap().processes.get(id) {
            Some(process) => Ok(process.clone()),
            None => bail!("no deployment process with id '{id}'"),
        }
    }

    async fn update_deployment_process(
        &self,
        process: &DeploymentProcess,
    ) -> Result<DeploymentProcess> {
        self.record(&format!(
            "update_deployment_process:{}",
            process.id.as_deref().unwrap_or("")
        ))?;
        let mut state = self.state.lock().unwrap();

        // The server assigns ids to new steps and actions on save.
        let mut saved = process.clone();
        for step in &mut saved.steps {
            if step.id.is_none() {
                let n = next(&mut state);
                step.id = Some(format!("steps-{n}"));
            }
            for action in &mut step.actions {
                if action.id.is_none() {
                    let n = next(&mut state);
                    action.id = Some(format!("actions-{n}"));
                }
            }
        }
        saved.version += 1;

        if let Some(id) = saved.id.clone() {
            state.processes.insert(id, saved.clone());
        }
        Ok(saved)
    }

    async fn get_variable_set(&self, id: &str) -> Result<VariableSetResource> {
        self.record(&format!("get_variable_set:{id}"))?;
        match self.state.lock().unwrap().variable_sets.get(id) {
            Some(set) => Ok(set.clone()),
            None => bail!("no variable set with id '{id}'"),
        }
    }

    async fn update_variable_set(
        &self,
        variable_set: &VariableSetResource,
    ) -> Result<VariableSetResource> {
        self.record(&format!(
            "update_variable_set:{}",
            variable_set.id.as_deref().unwrap_or("")
        ))?;
        let mut saved = variable_set.clone();
        saved.version += 1;
        if let Some(id) = saved.id.clone() {
            self.state.lock().unwrap().variable_sets.insert(id, saved.clone());
        }
        Ok(saved)
    }

    async fn list_channels(&self, project_id: &str) -> Result<Vec<Channel>> {
        self.record(&format!("list_channels:{project_id}"))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .channels
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_channel(&self, channel: &Channel) -> Result<Channel> {
        self.record(&format!("create_channel:{}", channel.name))?;
        let mut state = self.state.lock().unwrap();
        let n = next(&mut state);
        let mut created = channel.clone();
        created.id = Some(format!("channels-{n}"));
        state.channels.push(created.clone());
        Ok(created)
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>> {
        self.record("list_certificates")?;
        Ok(self.state.lock().unwrap().certificates.clone())
    }

    async fn delete_certificate(&self, id: &str) -> Result<()> {
        self.record(&format!("delete_certificate:{id}"))?;
        self.state
            .lock()
            .unwrap()
            .certificates
            .retain(|c| c.id.as_deref() != Some(id));
        Ok(())
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>> {
        self.record("list_feeds")?;
        Ok(self.state.lock().unwrap().feeds.clone())
    }

    async fn delete_feed(&self, id: &str) -> Result<()> {
        self.record(&format!("delete_feed:{id}"))?;
        self.state
            .lock()
            .unwrap()
            .feeds
            .retain(|f| f.id.as_deref() != Some(id));
        Ok(())
    }

    async fn list_library_variable_sets(&self) -> Result<Vec<LibraryVariableSet>> {
        self.record("list_library_variable_sets")?;
        Ok(self.state.lock().unwrap().library_sets.clone())
    }

    async fn create_library_variable_set(
        &self,
        set: &LibraryVariableSet,
    ) -> Result<LibraryVariableSet> {
        self.record(&format!("create_library_variable_set:{}", set.name))?;
        let mut state = self.state.lock().unwrap();
        let n = next(&mut state);
        let mut created = set.clone();
        created.id = Some(format!("libraryvariablesets-{n}"));
        state.library_sets.push(created.clone());
        Ok(created)
    }

    async fn delete_library_variable_set(&self, id: &str) -> Result<()> {
        self.record(&format!("delete_library_variable_set:{id}"))?;
        self.state
            .lock()
            .unwrap()
            .library_sets
            .retain(|s| s.id.as_deref() != Some(id));
        Ok(())
    }
}
