//! # logicapps - Azure Logic Apps Management and Deployment Generation
//!
//! **logicapps** manages Azure Logic Apps workflows (enable, disable, delete,
//! edit definitions, fetch trigger callback URLs) and turns a deployed
//! workflow into the artifacts needed to redeploy it from source control: an
//! ARM deployment template, a matching parameters file, and a CI pipeline.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Workflow**: Fetch it through a [`WorkflowClient`](management::WorkflowClient)
//!     or validate a JSON snapshot with [`Workflow::from_json_str`](workflow::Workflow::from_json_str).
//! 2.  **Generate**: [`generate_template`](template::generate_template) and
//!     [`generate_parameters`](template::generate_parameters) produce the ARM documents.
//!     Every workflow parameter is renamed to `workflows_<workflow>_parameters_<name>`
//!     so several workflows can share one template, and values from the last
//!     deployment become the new defaults.
//! 3.  **Pipeline**: [`generate_build_definition`](pipeline::generate_build_definition)
//!     renders the YAML pipeline step that deploys the template to a resource group.
//!
//! ## Quick Start
//!
//! ```rust
//! use logicapps::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let workflow = Workflow::from_json_str(r#"{
//!         "name": "wf1",
//!         "location": "westus",
//!         "definition": {
//!             "parameters": { "p1": { "type": "string", "defaultValue": "x" } }
//!         },
//!         "parameters": { "p1": { "value": "override" } }
//!     }"#)?;
//!
//!     let template = generate_template(&workflow)?;
//!     let p1 = template.parameters.get("workflows_wf1_parameters_p1").unwrap();
//!     assert_eq!(p1.default_value, Some(serde_json::json!("override")));
//!
//!     let pipeline = generate_build_definition(BuildDefinitionOptions {
//!         azure_subscription: "my-subscription".to_string(),
//!         csm_file: "wf1.template.json".to_string(),
//!         csm_parameters_file: "wf1.parameters.json".to_string(),
//!         location: "westus".to_string(),
//!         resource_group_name: "rg1".to_string(),
//!     })?;
//!     assert!(pipeline.contains("on rg1"));
//!
//!     println!("{}", template.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod management;
pub mod naming;
pub mod pipeline;
pub mod prelude;
pub mod template;
pub mod workflow;
