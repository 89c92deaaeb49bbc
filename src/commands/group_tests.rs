//! Tests for project group commands

use std::sync::Arc;

use crate::commands::group::{
    create_with_deps, delete_with_deps, list_with_deps, CreateGroupConfig, GroupDependencies,
};
use crate::commands::OutputFormat;
use crate::resources::ProjectGroup;
use crate::selector::Selector;
use crate::test_helpers::MockDeploymentClient;
use crate::ui::TestUserInterface;

fn group(id: &str, name: &str) -> ProjectGroup {
    ProjectGroup {
        id: Some(id.to_string()),
        name: name.to_string(),
        ..Default::default()
    }
}

fn deps(api: &Arc<MockDeploymentClient>, ui: &Arc<TestUserInterface>) -> GroupDependencies {
    GroupDependencies {
        ui: ui.clone(),
        api: api.clone(),
    }
}

#[tokio::test]
async fn test_list_all_groups() {
    let ui = Arc::new(TestUserInterface::new());
    let api = Arc::new(
        MockDeploymentClient::new()
            .with_group(group("projectgroups-1", "All Projects"))
            .with_group(group("projectgroups-2", "Archive")),
    );

    list_with_deps(&Selector::All, OutputFormat::Table, &deps(&api, &ui))
        .await
        .unwrap();

    let output = ui.get_output().join("\n");
    assert!(output.contains("All Projects"));
    assert!(output.contains("Archive"));
}

#[tokio::test]
async fn test_list_missing_name_warns() {
    let ui = Arc::new(TestUserInterface::new());
    let api = Arc::new(MockDeploymentClient::new());

    let selector = Selector::ByName(vec!["Nope".to_string()]);
    list_with_deps(&selector, OutputFormat::Table, &deps(&api, &ui))
        .await
        .unwrap();

    assert_eq!(
        ui.warnings(),
        vec!["The project group 'Nope' does not exist.".to_string()]
    );
}

#[tokio::test]
async fn test_create_group() {
    let ui = Arc::new(TestUserInterface::new());
    let api = Arc::new(MockDeploymentClient::new());

    create_with_deps(
        CreateGroupConfig {
            name: "New Group".to_string(),
            description: None,
        },
        &deps(&api, &ui),
    )
    .await
    .unwrap();

    assert_eq!(api.count_calls("create_project_group"), 1);
}

#[tokio::test]
async fn test_delete_requires_name_or_id() {
    let ui = Arc::new(TestUserInterface::new());
    let api = Arc::new(MockDeploymentClient::new());

    let result = delete_with_deps(&Selector::All, &deps(&api, &ui)).await;

    assert!(result.is_err());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_delete_by_id_warns_on_missing() {
    let ui = Arc::new(TestUserInterface::new());
    let api = Arc::new(
        MockDeploymentClient::new().with_group(group("projectgroups-1", "All Projects")),
    );

    let selector = Selector::ById(vec![
        "projectgroups-1".to_string(),
        "projectgroups-404".to_string(),
    ]);
    delete_with_deps(&selector, &deps(&api, &ui)).await.unwrap();

    // The existing group is removed, the missing one warned about
    assert_eq!(api.count_calls("delete_project_group"), 1);
    assert_eq!(
        ui.warnings(),
        vec!["A project group with the id 'projectgroups-404' does not exist.".to_string()]
    );
}
