use crate::naming::{name_parameter, parameter_reference, qualified_parameter};
use crate::workflow::{ParameterMap, ParameterValue, Workflow, WorkflowDefinition, WorkflowState};
use serde::Serialize;
use serde_json::{Map, Value};

pub const WORKFLOW_API_VERSION: &str = "2017-07-01";
pub const WORKFLOW_RESOURCE_TYPE: &str = "Microsoft.Logic/workflows";

/// A `Microsoft.Logic/workflows` entry in a deployment template's `resources`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResource {
    pub api_version: String,
    pub depends_on: Vec<String>,
    pub location: String,
    pub name: String,
    pub properties: WorkflowResourceProperties,
    pub scale: Option<Value>,
    pub tags: Map<String, Value>,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowResourceProperties {
    pub definition: WorkflowDefinition,
    pub parameters: ParameterMap<ParameterValue>,
    pub state: WorkflowState,
}

/// Builds the deployable resource for `workflow`.
///
/// Each definition parameter keeps its own name but its value becomes a
/// `[parameters('...')]` reference to the matching template parameter, and the
/// resource name reads the workflow name parameter. The definition itself is
/// embedded unchanged.
pub fn generate_template_resource(workflow: &Workflow) -> WorkflowResource {
    let parameters = workflow
        .definition
        .parameters()
        .keys()
        .map(|key| {
            let reference = parameter_reference(&qualified_parameter(&workflow.name, key));
            (key, ParameterValue::new(Some(Value::String(reference))))
        })
        .collect();

    WorkflowResource {
        api_version: WORKFLOW_API_VERSION.to_string(),
        depends_on: Vec::new(),
        location: workflow.location.clone(),
        name: parameter_reference(&name_parameter(&workflow.name)),
        properties: WorkflowResourceProperties {
            definition: workflow.definition.clone(),
            parameters,
            state: WorkflowState::Enabled,
        },
        scale: None,
        tags: Map::new(),
        resource_type: WORKFLOW_RESOURCE_TYPE.to_string(),
    }
}
