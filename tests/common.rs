//! Common test utilities: workflow fixtures and an in-memory management client.
use async_trait::async_trait;
use logicapps::prelude::*;
use serde_json::{Value, json};
use std::result::Result;
use std::sync::Mutex;

#[allow(dead_code)]
pub const WORKFLOW_ID: &str =
    "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Logic/workflows/wf1";

/// A workflow with one definition parameter and no prior deployment values.
///
/// `p1: string = "x"`
#[allow(dead_code)]
pub fn simple_workflow_json() -> Value {
    json!({
        "name": "wf1",
        "location": "westus",
        "definition": {
            "parameters": {
                "p1": { "type": "string", "defaultValue": "x" }
            }
        },
        "parameters": {}
    })
}

#[allow(dead_code)]
pub fn create_simple_workflow() -> Workflow {
    Workflow::from_value(simple_workflow_json()).expect("simple workflow fixture is valid")
}

/// A workflow with two definition parameters, `a` and `b`, where only `a`
/// has a value from the previous deployment.
#[allow(dead_code)]
pub fn create_two_parameter_workflow() -> Workflow {
    Workflow::from_value(json!({
        "id": WORKFLOW_ID,
        "name": "wf1",
        "location": "westus",
        "state": "Enabled",
        "definition": {
            "$schema": "https://schema.management.azure.com/providers/Microsoft.Logic/schemas/2016-06-01/workflowdefinition.json#",
            "contentVersion": "1.0.0.0",
            "parameters": {
                "a": { "type": "string", "defaultValue": "static-a" },
                "b": { "type": "int", "defaultValue": 3 }
            },
            "triggers": {
                "manual": { "type": "Request", "kind": "Http", "inputs": { "schema": {} } }
            },
            "actions": {
                "Response": {
                    "type": "Response",
                    "inputs": { "statusCode": 200, "body": "@parameters('a')" },
                    "runAfter": {}
                }
            },
            "outputs": {}
        },
        "parameters": {
            "a": { "value": "deployed-a" }
        }
    }))
    .expect("two parameter workflow fixture is valid")
}

/// An in-memory `WorkflowClient` that records the calls it receives.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeWorkflowClient {
    workflows: Mutex<Vec<(String, Workflow)>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeWorkflowClient {
    pub fn with_workflow(resource_group: &str, workflow: Workflow) -> Self {
        let client = Self::default();
        client
            .workflows
            .lock()
            .unwrap()
            .push((resource_group.to_string(), workflow));
        client
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self, resource_group: &str, workflow_name: &str) -> Option<Workflow> {
        self.workflows
            .lock()
            .unwrap()
            .iter()
            .find(|(rg, w)| rg == resource_group && w.name == workflow_name)
            .map(|(_, w)| w.clone())
    }

    fn record(&self, call: &str, resource_group: &str, workflow_name: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}/{}", call, resource_group, workflow_name));
    }

    fn set_state(
        &self,
        resource_group: &str,
        workflow_name: &str,
        state: WorkflowState,
    ) -> Result<(), ClientError> {
        let mut workflows = self.workflows.lock().unwrap();
        let (_, workflow) = workflows
            .iter_mut()
            .find(|(rg, w)| rg == resource_group && w.name == workflow_name)
            .ok_or_else(|| ClientError::NotFound(workflow_name.to_string()))?;
        workflow.state = Some(state);
        Ok(())
    }
}

#[async_trait]
impl WorkflowClient for FakeWorkflowClient {
    async fn list(&self, resource_group: &str) -> Result<Vec<Workflow>, ClientError> {
        Ok(self
            .workflows
            .lock()
            .unwrap()
            .iter()
            .filter(|(rg, _)| rg == resource_group)
            .map(|(_, w)| w.clone())
            .collect())
    }

    async fn get(
        &self,
        resource_group: &str,
        workflow_name: &str,
    ) -> Result<Workflow, ClientError> {
        self.record("get", resource_group, workflow_name);
        self.stored(resource_group, workflow_name)
            .ok_or_else(|| ClientError::NotFound(workflow_name.to_string()))
    }

    async fn create_or_update(
        &self,
        resource_group: &str,
        workflow_name: &str,
        workflow: &Workflow,
    ) -> Result<Workflow, ClientError> {
        self.record("create_or_update", resource_group, workflow_name);
        let mut workflows = self.workflows.lock().unwrap();
        workflows.retain(|(rg, w)| !(rg == resource_group && w.name == workflow_name));
        workflows.push((resource_group.to_string(), workflow.clone()));
        Ok(workflow.clone())
    }

    async fn enable(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError> {
        self.record("enable", resource_group, workflow_name);
        self.set_state(resource_group, workflow_name, WorkflowState::Enabled)
    }

    async fn disable(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError> {
        self.record("disable", resource_group, workflow_name);
        self.set_state(resource_group, workflow_name, WorkflowState::Disabled)
    }

    async fn delete(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError> {
        self.record("delete", resource_group, workflow_name);
        let mut workflows = self.workflows.lock().unwrap();
        let before = workflows.len();
        workflows.retain(|(rg, w)| !(rg == resource_group && w.name == workflow_name));
        if workflows.len() == before {
            return Err(ClientError::NotFound(workflow_name.to_string()));
        }
        Ok(())
    }

    async fn list_triggers(
        &self,
        resource_group: &str,
        workflow_name: &str,
    ) -> Result<Vec<WorkflowTrigger>, ClientError> {
        let workflow = self.get(resource_group, workflow_name).await?;
        let triggers = match workflow.definition.document().get("triggers") {
            Some(Value::Object(triggers)) => triggers
                .keys()
                .map(|name| WorkflowTrigger {
                    id: None,
                    name: name.clone(),
                    state: Some(WorkflowState::Enabled),
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(triggers)
    }

    async fn list_callback_url(
        &self,
        resource_group: &str,
        workflow_name: &str,
        trigger_name: &str,
    ) -> Result<CallbackUrl, ClientError> {
        let triggers = self.list_triggers(resource_group, workflow_name).await?;
        if !triggers.iter().any(|t| t.name == trigger_name) {
            return Err(ClientError::Api {
                status: 404,
                code: "WorkflowTriggerNotFound".to_string(),
                message: format!("The workflow trigger '{}' could not be found.", trigger_name),
            });
        }
        Ok(CallbackUrl {
            value: Some(format!(
                "https://prod.logic.example/workflows/{}/triggers/{}/paths/invoke",
                workflow_name, trigger_name
            )),
            method: Some("POST".to_string()),
            base_path: None,
        })
    }
}
