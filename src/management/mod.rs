//! Access to the remote workflow management plane.
//!
//! Everything that talks to Azure goes through [`WorkflowClient`], so command
//! handlers and the editor can be driven by any implementation: the
//! [`ArmWorkflowClient`] in production, an in-memory fake in tests.

use crate::error::ClientError;
use crate::workflow::{Workflow, WorkflowState};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod arm;

pub use arm::{ArmWorkflowClient, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};

/// A trigger declared by a deployed workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<WorkflowState>,
}

/// The invocation endpoint of a workflow trigger.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackUrl {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

/// Operations on workflows, addressed by resource group and workflow name.
#[async_trait]
pub trait WorkflowClient: Send + Sync {
    async fn list(&self, resource_group: &str) -> Result<Vec<Workflow>, ClientError>;

    async fn get(&self, resource_group: &str, workflow_name: &str)
    -> Result<Workflow, ClientError>;

    /// Replaces the workflow and returns the resource as stored by the service.
    async fn create_or_update(
        &self,
        resource_group: &str,
        workflow_name: &str,
        workflow: &Workflow,
    ) -> Result<Workflow, ClientError>;

    async fn enable(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError>;

    async fn disable(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError>;

    async fn delete(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError>;

    async fn list_triggers(
        &self,
        resource_group: &str,
        workflow_name: &str,
    ) -> Result<Vec<WorkflowTrigger>, ClientError>;

    async fn list_callback_url(
        &self,
        resource_group: &str,
        workflow_name: &str,
        trigger_name: &str,
    ) -> Result<CallbackUrl, ClientError>;
}
