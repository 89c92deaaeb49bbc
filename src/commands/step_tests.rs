//! Tests for step commands

use std::sync::Arc;

use crate::commands::step::{copy_with_deps, CopyStepConfig, StepDependencies};
use crate::resources::{DeploymentAction, DeploymentProcess, DeploymentStep, Project};
use crate::test_helpers::MockDeploymentClient;
use crate::ui::TestUserInterface;

fn fixture() -> MockDeploymentClient {
    let project = Project {
        id: Some("projects-1".to_string()),
        name: "Website".to_string(),
        deployment_process_id: Some("deploymentprocesses-1".to_string()),
        ..Default::default()
    };
    let process = DeploymentProcess {
        id: Some("deploymentprocesses-1".to_string()),
        project_id: "projects-1".to_string(),
        steps: vec![DeploymentStep {
            id: Some("steps-1".to_string()),
            name: "Deploy".to_string(),
            actions: vec![DeploymentAction {
                id: Some("actions-1".to_string()),
                name: "Run script".to_string(),
                action_type: "Drydock.Script".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }],
        version: 1,
    };
    MockDeploymentClient::new()
        .with_project(project)
        .with_process(process)
}

fn deps(api: &Arc<MockDeploymentClient>, ui: &Arc<TestUserInterface>) -> StepDependencies {
    StepDependencies {
        ui: ui.clone(),
        api: api.clone(),
    }
}

#[tokio::test]
async fn test_copy_appends_clone_and_saves_once() {
    let ui = Arc::new(TestUserInterface::new());
    let api = Arc::new(fixture());

    copy_with_deps(
        CopyStepConfig {
            project: "Website".to_string(),
            source: "Deploy".to_string(),
            destination: None,
        },
        &deps(&api, &ui),
    )
    .await
    .unwrap();

    assert_eq!(api.count_calls("update_deployment_process"), 1);
    let process = api.stored_process("deploymentprocesses-1").unwrap();
    assert_eq!(process.steps.len(), 2);
    // The source step is untouched, the clone follows it under the default name
    assert_eq!(process.steps[0].name, "Deploy");
    assert_eq!(process.steps[1].name, "Deploy - Copy");
    assert_eq!(process.steps[1].actions.len(), 1);
    assert_ne!(process.steps[1].id, process.steps[0].id);
    assert_ne!(
        process.steps[1].actions[0].id,
        process.steps[0].actions[0].id
    );
}

#[tokio::test]
async fn test_copy_with_explicit_destination_name() {
    let ui = Arc::new(TestUserInterface::new());
    let api = Arc::new(fixture());

    copy_with_deps(
        CopyStepConfig {
            project: "Website".to_string(),
            source: "Deploy".to_string(),
            destination: Some("Deploy Again".to_string()),
        },
        &deps(&api, &ui),
    )
    .await
    .unwrap();

    let process = api.stored_process("deploymentprocesses-1").unwrap();
    assert_eq!(process.steps[1].name, "Deploy Again");
}

#[tokio::test]
async fn test_copy_unknown_step_is_fatal() {
    let ui = Arc::new(TestUserInterface::new());
    let api = Arc::new(fixture());

    let result = copy_with_deps(
        CopyStepConfig {
            project: "Website".to_string(),
            source: "Nope".to_string(),
            destination: None,
        },
        &deps(&api, &ui),
    )
    .await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "The step 'Nope' does not exist."
    );
    assert_eq!(api.count_calls("update_deployment_process"), 0);
}
