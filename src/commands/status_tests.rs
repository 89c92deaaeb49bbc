//! Tests for the status command

use std::sync::Arc;

use crate::commands::connect::StoredSession;
use crate::commands::status::{execute_with_deps, StatusDependencies};
use crate::test_helpers::MockSessionStore;
use crate::ui::TestUserInterface;

#[test]
fn test_status_shows_server_and_masked_key() {
    let ui = Arc::new(TestUserInterface::new());
    let mut store = MockSessionStore::new();
    store.expect_load().returning(|| {
        Ok(Some(StoredSession {
            server_url: "https://deploy.example.com".to_string(),
            api_key: "API-ABCDEF1234567890".to_string(),
        }))
    });

    let deps = StatusDependencies {
        ui: ui.clone(),
        session_store: Arc::new(store),
    };

    execute_with_deps(&deps).unwrap();

    let output = ui.get_output().join("\n");
    assert!(output.contains("Server:  https://deploy.example.com"));
    assert!(output.contains("API key: API-ABCD****"));
    // The full key never appears in the output
    assert!(!output.contains("API-ABCDEF1234567890"));
}

#[test]
fn test_status_when_not_connected() {
    let ui = Arc::new(TestUserInterface::new());
    let mut store = MockSessionStore::new();
    store.expect_load().returning(|| Ok(None));

    let deps = StatusDependencies {
        ui: ui.clone(),
        session_store: Arc::new(store),
    };

    execute_with_deps(&deps).unwrap();
    assert!(ui
        .get_output()
        .join("\n")
        .contains("Not connected to a Drydock server. Run 'drydock connect' first."));
}
