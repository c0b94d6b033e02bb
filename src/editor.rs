//! Editing a workflow definition as a JSON text document.

use crate::document::to_pretty_json;
use crate::error::{EditorError, WorkflowError};
use crate::management::WorkflowClient;
use crate::workflow::{Workflow, WorkflowDefinition};
use tracing::info;

/// Opens workflow definitions as text and saves edited text back to the
/// management plane.
pub struct WorkflowEditor<'a, C: WorkflowClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: WorkflowClient + ?Sized> WorkflowEditor<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// The definition rendered as four-space indented JSON.
    pub fn get_data(&self, workflow: &Workflow) -> Result<String, EditorError> {
        to_pretty_json(&workflow.definition).map_err(|e| EditorError::Serialization(e.to_string()))
    }

    pub fn filename(&self, workflow: &Workflow) -> String {
        format!("{}.logicapp.json", workflow.name)
    }

    pub fn save_confirmation_text(&self, workflow: &Workflow) -> String {
        format!(
            "Saving '{}' will update the Logic App definition in your subscription.",
            workflow.name
        )
    }

    /// Saves `document` as the new definition of `workflow`.
    ///
    /// `None` means the editor holding the document is gone. On success the
    /// definition stored by the service is returned, rendered like
    /// [`get_data`](Self::get_data).
    pub async fn update_data(
        &self,
        workflow: &Workflow,
        document: Option<&str>,
    ) -> Result<String, EditorError> {
        let text = document.ok_or(EditorError::DocumentClosed)?;
        let value = serde_json::from_str(text)
            .map_err(|e| WorkflowError::definition(format!("not valid JSON: {}", e)))?;
        let definition = WorkflowDefinition::from_value(value)?;

        let resource_group = workflow.resource_group()?;
        info!(workflow = %workflow.name, %resource_group, "updating workflow definition");

        let updated = self
            .client
            .create_or_update(
                &resource_group,
                &workflow.name,
                &workflow.with_definition(definition),
            )
            .await?;
        self.get_data(&updated)
    }
}
