//! Establish a session with a Drydock server.
//!
//! The server address and API key are validated with a server info probe
//! before anything is stored; an unreachable server or rejected key is
//! fatal with no retry.

use std::sync::Arc;

use anyhow::Result;

use crate::deps::{MessageStyle, SessionStore, UserInterface};

/// The session persisted between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub server_url: String,
    pub api_key: String,
}

pub struct ConnectConfig {
    pub server_url: String,
    pub api_key: String,
}

pub struct ConnectDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn crate::deps::DeploymentClient>,
    pub session_store: Arc<dyn SessionStore>,
}

pub async fn execute_with_deps(config: ConnectConfig, deps: Arc<ConnectDependencies>) -> Result<()> {
    deps.ui
        .print(&format!("→ Connecting to {}", config.server_url));

    let spinner = deps.ui.create_spinner();
    spinner.set_message("Checking server");
    let probe = deps.api.server_info().await;
    spinner.finish_and_clear();

    let info = match probe {
        Ok(info) => info,
        Err(e) => {
            deps.ui.print_styled(
                &format!("✗ Unable to reach the Drydock server at {}", config.server_url),
                MessageStyle::Error,
            );
            return Err(e.context(format!(
                "Unable to reach the Drydock server at {}",
                config.server_url
            )));
        }
    };

    deps.session_store.store(&StoredSession {
        server_url: config.server_url.clone(),
        api_key: config.api_key,
    })?;

    deps.ui.print_styled(
        &format!(
            "Connected to {} ({} {})",
            config.server_url, info.application, info.version
        ),
        MessageStyle::Success,
    );

    Ok(())
}
