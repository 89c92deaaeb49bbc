//! Show the stored session without touching the network.

use std::sync::Arc;

use anyhow::Result;

use crate::deps::{MessageStyle, SessionStore, UserInterface};

pub struct StatusDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub session_store: Arc<dyn SessionStore>,
}

pub fn execute_with_deps(deps: &StatusDependencies) -> Result<()> {
    match deps.session_store.load()? {
        Some(session) => {
            deps.ui
                .print_styled("Connection", MessageStyle::Cyan);
            deps.ui.print(&format!("  Server:  {}", session.server_url));
            deps.ui
                .print(&format!("  API key: {}", mask_key(&session.api_key)));
        }
        None => {
            deps.ui.print_styled(
                "Not connected to a Drydock server. Run 'drydock connect' first.",
                MessageStyle::Yellow,
            );
        }
    }
    Ok(())
}

/// Only the key prefix is ever shown.
fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(8).collect();
    if key.chars().count() <= 8 {
        "********".to_string()
    } else {
        format!("{prefix}****")
    }
}
