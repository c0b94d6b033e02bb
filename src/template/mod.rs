//! ARM deployment template generation.
//!
//! A workflow is turned into two documents that are deployed together:
//!
//! * a **deployment template** declaring one qualified parameter per workflow
//!   parameter and a single `Microsoft.Logic/workflows` resource that reads them
//! * a **deployment parameters file** supplying a value for each of those
//!   parameters, seeded from the workflow's last deployment
//!
//! All functions here are pure: the same workflow always produces the same
//! documents, in the same key order.
//!
//! # Example
//!
//! ```rust
//! use logicapps::template::{generate_parameters, generate_template};
//! use logicapps::workflow::Workflow;
//!
//! let workflow = Workflow::from_json_str(r#"{
//!     "name": "wf1",
//!     "location": "westus",
//!     "definition": { "parameters": { "p1": { "type": "string", "defaultValue": "x" } } }
//! }"#).unwrap();
//!
//! let template = generate_template(&workflow).unwrap();
//! assert!(template.parameters.contains_key("workflows_wf1_parameters_p1"));
//!
//! let parameters = generate_parameters(&workflow).unwrap();
//! assert_eq!(
//!     parameters.parameters.keys().collect::<Vec<_>>(),
//!     template.parameters.keys().collect::<Vec<_>>(),
//! );
//! ```

use crate::document::to_pretty_json;
use crate::error::TemplateError;
use crate::workflow::{ParameterDefinition, ParameterMap, ParameterValue, Workflow};
use serde::Serialize;
use serde_json::{Map, Value};

mod parameters;
mod resource;

pub use parameters::{generate_template_parameter, generate_template_parameter_definition};
pub use resource::{
    WORKFLOW_API_VERSION, WORKFLOW_RESOURCE_TYPE, WorkflowResource, WorkflowResourceProperties,
    generate_template_resource,
};

use parameters::insert_qualified;

pub const DEPLOYMENT_TEMPLATE_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2015-01-01/deploymentTemplate.json#";
pub const DEPLOYMENT_PARAMETERS_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2015-01-01/deploymentParameters.json#";
pub const CONTENT_VERSION: &str = "1.0.0.0";

/// An ARM deployment template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTemplate {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub content_version: String,
    pub parameters: ParameterMap<ParameterDefinition>,
    pub resources: Vec<WorkflowResource>,
    pub variables: Map<String, Value>,
}

impl DeploymentTemplate {
    pub fn new(
        parameters: ParameterMap<ParameterDefinition>,
        resources: Vec<WorkflowResource>,
    ) -> Self {
        Self {
            schema: DEPLOYMENT_TEMPLATE_SCHEMA.to_string(),
            content_version: CONTENT_VERSION.to_string(),
            parameters,
            resources,
            variables: Map::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        to_pretty_json(self).map_err(|e| TemplateError::Serialization(e.to_string()))
    }
}

/// An ARM deployment parameters file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentParameters {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub content_version: String,
    pub parameters: ParameterMap<ParameterValue>,
}

impl DeploymentParameters {
    pub fn new(parameters: ParameterMap<ParameterValue>) -> Self {
        Self {
            schema: DEPLOYMENT_PARAMETERS_SCHEMA.to_string(),
            content_version: CONTENT_VERSION.to_string(),
            parameters,
        }
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        to_pretty_json(self).map_err(|e| TemplateError::Serialization(e.to_string()))
    }
}

/// A template and its parameters file, generated together.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentBundle {
    pub template: DeploymentTemplate,
    pub parameters: DeploymentParameters,
}

/// Wraps the workflow's parameter definitions and resource into a template.
pub fn generate_template(workflow: &Workflow) -> Result<DeploymentTemplate, TemplateError> {
    Ok(DeploymentTemplate::new(
        generate_template_parameter_definition(workflow)?,
        vec![generate_template_resource(workflow)],
    ))
}

/// Wraps the workflow's parameter values into a parameters file.
pub fn generate_parameters(workflow: &Workflow) -> Result<DeploymentParameters, TemplateError> {
    Ok(DeploymentParameters::new(generate_template_parameter(
        workflow,
    )?))
}

/// Generates one template and one parameters file deploying every workflow in
/// `workflows`. Qualified parameter names must be unique across all of them.
pub fn generate_combined_template(workflows: &[Workflow]) -> Result<DeploymentBundle, TemplateError> {
    let mut definitions = ParameterMap::new();
    let mut values = ParameterMap::new();
    let mut resources = Vec::with_capacity(workflows.len());

    for workflow in workflows {
        for (key, definition) in generate_template_parameter_definition(workflow)? {
            insert_qualified(&mut definitions, workflow, key, definition)?;
        }
        for (key, value) in generate_template_parameter(workflow)? {
            insert_qualified(&mut values, workflow, key, value)?;
        }
        resources.push(generate_template_resource(workflow));
    }

    Ok(DeploymentBundle {
        template: DeploymentTemplate::new(definitions, resources),
        parameters: DeploymentParameters::new(values),
    })
}
