//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! logicapps crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use logicapps::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let text = std::fs::read_to_string("path/to/workflow.json")?;
//! let workflow = Workflow::from_json_str(&text)?;
//!
//! std::fs::write("wf.template.json", generate_template(&workflow)?.to_json()?)?;
//! std::fs::write("wf.parameters.json", generate_parameters(&workflow)?.to_json()?)?;
//! # Ok(())
//! # }
//! ```

// Template generation
pub use crate::pipeline::{BuildDefinition, BuildDefinitionOptions, generate_build_definition};
pub use crate::template::{
    DeploymentBundle, DeploymentParameters, DeploymentTemplate, WorkflowResource,
    generate_combined_template, generate_parameters, generate_template,
    generate_template_parameter, generate_template_parameter_definition,
    generate_template_resource,
};

// Workflow model
pub use crate::workflow::{
    ParameterDefinition, ParameterMap, ParameterValue, ResourceId, Workflow, WorkflowDefinition,
    WorkflowState,
};

// Management
pub use crate::config::ManagerConfig;
pub use crate::editor::WorkflowEditor;
pub use crate::management::{ArmWorkflowClient, CallbackUrl, WorkflowClient, WorkflowTrigger};

// Error types
pub use crate::error::{
    ClientError, CommandError, ConfigError, EditorError, TemplateError, WorkflowError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
