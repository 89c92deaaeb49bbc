use std::sync::Arc;

use anyhow::Result;

use crate::deps::{MessageStyle, SessionStore, UserInterface};

pub struct DisconnectDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub session_store: Arc<dyn SessionStore>,
}

pub fn execute_with_deps(deps: &DisconnectDependencies) -> Result<()> {
    deps.ui.print("→ Disconnecting from Drydock");

    match deps.session_store.clear() {
        Ok(()) => {
            deps.ui
                .print_styled("Disconnected.", MessageStyle::Success);
            Ok(())
        }
        Err(e) => {
            if e.to_string().contains("No matching entry found") {
                deps.ui.print("Not currently connected.");
                Ok(())
            } else {
                Err(e)
            }
        }
    }
}
