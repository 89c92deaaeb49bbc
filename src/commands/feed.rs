//! External package feed commands.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::commands::{select_from, OutputFormat};
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, Feed};
use crate::selector::Selector;

pub struct FeedDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

pub async fn list_with_deps(
    selector: &Selector,
    format: OutputFormat,
    deps: &FeedDependencies,
) -> Result<()> {
    let feeds = deps.api.list_feeds().await?;
    let matched = select_from(
        &feeds,
        selector,
        "feed",
        |f| &f.name,
        |f| f.id.as_deref(),
        deps.ui.as_ref(),
    );
    render(&matched, format, deps);
    Ok(())
}

pub async fn delete_with_deps(selector: &Selector, deps: &FeedDependencies) -> Result<()> {
    if matches!(selector, Selector::All) {
        bail!("either --name or --id must be supplied");
    }

    let feeds = deps.api.list_feeds().await?;
    let targets = select_from(
        &feeds,
        selector,
        "feed",
        |f| &f.name,
        |f| f.id.as_deref(),
        deps.ui.as_ref(),
    );

    for feed in targets {
        deps.api
            .delete_feed(require_id(&feed.id, "feed")?)
            .await?;
        deps.ui.print_styled(
            &format!("Deleted feed '{}'.", feed.name),
            MessageStyle::Success,
        );
    }

    Ok(())
}

fn render(feeds: &[Feed], format: OutputFormat, deps: &FeedDependencies) {
    if feeds.is_empty() {
        deps.ui.print_styled("No feeds found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(feeds) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for feed in feeds {
                deps.ui.print_styled(&feed.name, MessageStyle::Bold);
                deps.ui
                    .print(&format!("  Id:  {}", feed.id.as_deref().unwrap_or("-")));
                deps.ui.print(&format!("  Uri: {}", feed.feed_uri));
            }
        }
    }
}
