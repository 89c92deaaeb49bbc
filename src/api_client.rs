//! Typed HTTP client for the Drydock REST API.
//!
//! One method per REST operation; transport concerns (auth header, timeout,
//! JSON (de)serialization, status mapping) live here so command handlers
//! only deal in resource types. No retries are performed: a network failure
//! propagates as an error that aborts the current command.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DEFAULT_API_TIMEOUT_SECS;
use crate::resources::{
    require_id, Certificate, Channel, DeploymentProcess, Environment, Feed, LibraryVariableSet,
    Machine, Project, ProjectGroup, ServerInfo, VariableSetResource,
};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Configuration for the Drydock API client
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

/// Create a configured Drydock API client
pub fn create_client(config: ApiConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();

    if let Some(key) = config.api_key {
        let value =
            HeaderValue::from_str(&key).context("API key contains invalid header characters")?;
        headers.insert(API_KEY_HEADER, value);
    }

    let http = reqwest::ClientBuilder::new()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?;

    Ok(Client {
        base_url: config.base_url.trim_end_matches('/').to_string(),
        http,
    })
}

pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        Self::into_json(response, path).await
    }

    /// GET where a 404 means "does not exist" rather than an error.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::into_json(response, path).await.map(Some)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?;
        Self::into_json(response, path).await
    }

    async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("PUT {path} failed"))?;
        Self::into_json(response, path).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(path))
            .send()
            .await
            .with_context(|| format!("DELETE {path} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("server returned {status} for DELETE {path}: {body}");
        }
        Ok(())
    }

    async fn into_json<T: DeserializeOwned>(response: reqwest::Response, path: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("server returned {status} for {path}: {body}");
        }

        response
            .json()
            .await
            .with_context(|| format!("failed to parse response body from {path}"))
    }

    pub async fn server_info(&self) -> Result<ServerInfo> {
        self.get_json("/api").await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_json("/api/projects/all").await
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        self.get_optional(&format!("/api/projects/{id}")).await
    }

    pub async fn create_project(&self, project: &Project) -> Result<Project> {
        self.post_json("/api/projects", project).await
    }

    pub async fn update_project(&self, project: &Project) -> Result<Project> {
        let id = require_id(&project.id, "project")?;
        self.put_json(&format!("/api/projects/{id}"), project).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/projects/{id}")).await
    }

    pub async fn list_project_groups(&self) -> Result<Vec<ProjectGroup>> {
        self.get_json("/api/projectgroups/all").await
    }

    pub async fn create_project_group(&self, group: &ProjectGroup) -> Result<ProjectGroup> {
        self.post_json("/api/projectgroups", group).await
    }

    pub async fn delete_project_group(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/projectgroups/{id}")).await
    }

    pub async fn list_environments(&self) -> Result<Vec<Environment>> {
        self.get_json("/api/environments/all").await
    }

    pub async fn get_environment(&self, id: &str) -> Result<Option<Environment>> {
        self.get_optional(&format!("/api/environments/{id}")).await
    }

    pub async fn create_environment(&self, environment: &Environment) -> Result<Environment> {
        self.post_json("/api/environments", environment).await
    }

    pub async fn delete_environment(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/environments/{id}")).await
    }

    pub async fn list_machines(&self) -> Result<Vec<Machine>> {
        self.get_json("/api/machines/all").await
    }

    pub async fn delete_machine(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/machines/{id}")).await
    }

    pub async fn get_deployment_process(&self, id: &str) -> Result<DeploymentProcess> {
        self.get_json(&format!("/api/deploymentprocesses/{id}"))
            .await
    }

    pub async fn update_deployment_process(
        &self,
        process: &DeploymentProcess,
    ) -> Result<DeploymentProcess> {
        let id = require_id(&process.id, "deployment process")?;
        self.put_json(&format!("/api/deploymentprocesses/{id}"), process)
            .await
    }

    pub async fn get_variable_set(&self, id: &str) -> Result<VariableSetResource> {
        self.get_json(&format!("/api/variables/{id}")).await
    }

    pub async fn update_variable_set(
        &self,
        variable_set: &VariableSetResource,
    ) -> Result<VariableSetResource> {
        let id = require_id(&variable_set.id, "variable set")?;
        self.put_json(&format!("/api/variables/{id}"), variable_set)
            .await
    }

    pub async fn list_channels(&self, project_id: &str) -> Result<Vec<Channel>> {
        self.get_json(&format!("/api/projects/{project_id}/channels"))
            .await
    }

    pub async fn create_channel(&self, channel: &Channel) -> Result<Channel> {
        self.post_json("/api/channels", channel).await
    }

    pub async fn list_certificates(&self) -> Result<Vec<Certificate>> {
        self.get_json("/api/certificates/all").await
    }

    pub async fn delete_certificate(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/certificates/{id}")).await
    }

    pub async fn list_feeds(&self) -> Result<Vec<Feed>> {
        self.get_json("/api/feeds/all").await
    }

    pub async fn delete_feed(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/feeds/{id}")).await
    }

    pub async fn list_library_variable_sets(&self) -> Result<Vec<LibraryVariableSet>> {
        self.get_json("/api/libraryvariablesets/all").await
    }

    pub async fn create_library_variable_set(
        &self,
        set: &LibraryVariableSet,
    ) -> Result<LibraryVariableSet> {
        self.post_json("/api/libraryvariablesets", set).await
    }

    pub async fn delete_library_variable_set(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/libraryvariablesets/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_trims_trailing_slash() {
        let client = create_client(ApiConfig::new(
            "https://deploy.example.com/".to_string(),
            Some("API-ABC123".to_string()),
        ))
        .unwrap();
        assert_eq!(client.base_url(), "https://deploy.example.com");
    }

    #[test]
    fn test_create_client_rejects_invalid_key() {
        let result = create_client(ApiConfig::new(
            "https://deploy.example.com".to_string(),
            Some("bad\nkey".to_string()),
        ));
        assert!(result.is_err());
    }
}
