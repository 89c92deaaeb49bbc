//! Release channel commands.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::commands::OutputFormat;
use crate::copy;
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, Channel, Project};
use crate::selector::{not_found_by_name, Selector};

pub struct ChannelDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

pub async fn list_with_deps(
    project: &str,
    selector: &Selector,
    format: OutputFormat,
    deps: &ChannelDependencies,
) -> Result<()> {
    let (_, channels) = load_channels(project, deps).await?;

    let matched: Vec<&Channel> = match selector {
        Selector::All => channels.iter().collect(),
        Selector::ByName(names) => names
            .iter()
            .filter_map(|name| {
                let found = channels.iter().find(|c| c.name == *name);
                if found.is_none() {
                    deps.ui
                        .print_styled(&not_found_by_name("channel", name), MessageStyle::Warning);
                }
                found
            })
            .collect(),
        Selector::ById(_) => bail!("channels are addressed by name, not by id"),
    };

    render(&matched, format, deps);
    Ok(())
}

pub struct CopyChannelConfig {
    pub project: String,
    pub source: String,
    /// Destination channel name; defaults to "<source> - Copy".
    pub destination: Option<String>,
}

/// Clone a channel within its project. The copy keeps the source's rules,
/// tenant tags and lifecycle but is never the default channel.
pub async fn copy_with_deps(config: CopyChannelConfig, deps: &ChannelDependencies) -> Result<()> {
    let (project, channels) = load_channels(&config.project, deps).await?;
    let Some(source) = channels.iter().find(|c| c.name == config.source) else {
        bail!(not_found_by_name("channel", &config.source));
    };

    let clone = copy::clone_channel(
        source,
        require_id(&project.id, "project")?,
        config.destination.as_deref(),
    );
    let created = deps.api.create_channel(&clone).await?;

    deps.ui.print_styled(
        &format!(
            "Copied channel '{}' to '{}'.",
            config.source, created.name
        ),
        MessageStyle::Success,
    );
    Ok(())
}

async fn load_channels(
    project_name: &str,
    deps: &ChannelDependencies,
) -> Result<(Project, Vec<Channel>)> {
    let projects = deps.api.list_projects().await?;
    let Some(project) = projects.into_iter().find(|p| p.name == project_name) else {
        bail!(not_found_by_name("project", project_name));
    };

    let channels = deps
        .api
        .list_channels(require_id(&project.id, "project")?)
        .await?;
    Ok((project, channels))
}

fn render(channels: &[&Channel], format: OutputFormat, deps: &ChannelDependencies) {
    if channels.is_empty() {
        deps.ui
            .print_styled("No channels found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(channels) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for channel in channels {
                deps.ui.print_styled(&channel.name, MessageStyle::Bold);
                deps.ui
                    .print(&format!("  Id: {}", channel.id.as_deref().unwrap_or("-")));
                if channel.is_default {
                    deps.ui.print("  Default channel");
                }
                if !channel.rules.is_empty() {
                    deps.ui
                        .print(&format!("  Rules: {}", channel.rules.len()));
                }
            }
        }
    }
}
