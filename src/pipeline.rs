//! CI pipeline definitions that deploy a generated template to a resource group.

use crate::error::TemplateError;
use serde::{Deserialize, Serialize};

pub const DEPLOYMENT_TASK: &str = "AzureResourceGroupDeployment@2";
pub const HOSTED_POOL: &str = "Hosted";

/// Where and how the deployment step should run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDefinitionOptions {
    pub azure_subscription: String,
    /// Path of the deployment template, relative to the repository root.
    pub csm_file: String,
    /// Path of the deployment parameters file, relative to the repository root.
    pub csm_parameters_file: String,
    pub location: String,
    pub resource_group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDefinition {
    pub resources: Vec<RepositoryResource>,
    pub pool: Pool,
    pub steps: Vec<BuildStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryResource {
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStep {
    pub task: String,
    pub display_name: String,
    pub inputs: BuildDefinitionOptions,
}

impl BuildDefinition {
    /// A single-step pipeline running a resource group deployment.
    pub fn new(options: BuildDefinitionOptions) -> Self {
        let display_name = format!(
            "Azure Deployment: Create Or Update Resource Group action on {}",
            options.resource_group_name
        );
        Self {
            resources: vec![RepositoryResource {
                repo: "self".to_string(),
            }],
            pool: Pool {
                name: HOSTED_POOL.to_string(),
            },
            steps: vec![BuildStep {
                task: DEPLOYMENT_TASK.to_string(),
                display_name,
                inputs: options,
            }],
        }
    }

    pub fn to_yaml(&self) -> Result<String, TemplateError> {
        serde_yaml::to_string(self).map_err(|e| TemplateError::Serialization(e.to_string()))
    }
}

/// Renders the pipeline YAML for `options`.
pub fn generate_build_definition(options: BuildDefinitionOptions) -> Result<String, TemplateError> {
    BuildDefinition::new(options).to_yaml()
}
