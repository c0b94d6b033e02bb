//! Command handlers. Each one addresses a workflow by its ARM resource id and
//! delegates to a [`WorkflowClient`].

use crate::editor::WorkflowEditor;
use crate::error::CommandError;
use crate::management::{WorkflowClient, WorkflowTrigger};
use crate::naming::normalize_resource_name;
use crate::pipeline::{BuildDefinition, BuildDefinitionOptions};
use crate::template::{generate_parameters, generate_template};
use crate::workflow::{ResourceId, Workflow};
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where an exported pipeline deploys to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub azure_subscription: String,
    pub location: String,
    pub resource_group_name: String,
}

/// Files written by [`export_deployment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub template: PathBuf,
    pub parameters: PathBuf,
    pub pipeline: PathBuf,
}

pub async fn enable_workflow<C: WorkflowClient + ?Sized>(
    client: &C,
    workflow_id: &str,
) -> Result<(), CommandError> {
    let id: ResourceId = workflow_id.parse()?;
    info!(workflow = %id.name, "Enabling...");
    client.enable(&id.resource_group, &id.name).await?;
    Ok(())
}

pub async fn disable_workflow<C: WorkflowClient + ?Sized>(
    client: &C,
    workflow_id: &str,
) -> Result<(), CommandError> {
    let id: ResourceId = workflow_id.parse()?;
    info!(workflow = %id.name, "Disabling...");
    client.disable(&id.resource_group, &id.name).await?;
    Ok(())
}

pub async fn delete_workflow<C: WorkflowClient + ?Sized>(
    client: &C,
    workflow_id: &str,
) -> Result<(), CommandError> {
    let id: ResourceId = workflow_id.parse()?;
    info!(workflow = %id.name, "Deleting...");
    client.delete(&id.resource_group, &id.name).await?;
    Ok(())
}

/// Fetches the callback URL of `trigger_name`.
pub async fn get_trigger_url<C: WorkflowClient + ?Sized>(
    client: &C,
    workflow_id: &str,
    trigger_name: &str,
) -> Result<String, CommandError> {
    let id: ResourceId = workflow_id.parse()?;
    info!(workflow = %id.name, trigger = trigger_name, "Working...");
    let callback = client
        .list_callback_url(&id.resource_group, &id.name, trigger_name)
        .await?;
    callback.value.ok_or_else(|| CommandError::MissingCallbackUrl {
        trigger: trigger_name.to_string(),
    })
}

pub async fn list_triggers<C: WorkflowClient + ?Sized>(
    client: &C,
    workflow_id: &str,
) -> Result<Vec<WorkflowTrigger>, CommandError> {
    let id: ResourceId = workflow_id.parse()?;
    Ok(client.list_triggers(&id.resource_group, &id.name).await?)
}

/// One line summary of `triggers`, e.g. `manual (Enabled), recurrence`.
pub fn describe_triggers(triggers: &[WorkflowTrigger]) -> String {
    triggers
        .iter()
        .map(|trigger| match trigger.state {
            Some(state) => format!("{} ({})", trigger.name, state),
            None => trigger.name.clone(),
        })
        .join(", ")
}

/// The workflow's definition as editor text.
pub async fn show_definition<C: WorkflowClient + ?Sized>(
    client: &C,
    workflow_id: &str,
) -> Result<String, CommandError> {
    let id: ResourceId = workflow_id.parse()?;
    let workflow = client.get(&id.resource_group, &id.name).await?;
    Ok(WorkflowEditor::new(client).get_data(&workflow)?)
}

/// Replaces the workflow's definition with `definition` text and returns the
/// stored definition.
pub async fn update_definition<C: WorkflowClient + ?Sized>(
    client: &C,
    workflow_id: &str,
    definition: &str,
) -> Result<String, CommandError> {
    let id: ResourceId = workflow_id.parse()?;
    let workflow = client.get(&id.resource_group, &id.name).await?;
    Ok(WorkflowEditor::new(client)
        .update_data(&workflow, Some(definition))
        .await?)
}

/// Writes the deployment template, parameters file and pipeline for
/// `workflow` into `directory`. The pipeline refers to the two JSON files by
/// file name.
pub fn export_deployment(
    workflow: &Workflow,
    target: &DeploymentTarget,
    directory: &Path,
) -> Result<ExportedFiles, CommandError> {
    let stem = normalize_resource_name(&workflow.name);
    let template_name = format!("{}.template.json", stem);
    let parameters_name = format!("{}.parameters.json", stem);

    let template = generate_template(workflow)?.to_json()?;
    let parameters = generate_parameters(workflow)?.to_json()?;
    let pipeline = BuildDefinition::new(BuildDefinitionOptions {
        azure_subscription: target.azure_subscription.clone(),
        csm_file: template_name.clone(),
        csm_parameters_file: parameters_name.clone(),
        location: target.location.clone(),
        resource_group_name: target.resource_group_name.clone(),
    })
    .to_yaml()?;

    let files = ExportedFiles {
        template: directory.join(template_name),
        parameters: directory.join(parameters_name),
        pipeline: directory.join(format!("{}.pipeline.yml", stem)),
    };
    write_file(&files.template, &template)?;
    write_file(&files.parameters, &parameters)?;
    write_file(&files.pipeline, &pipeline)?;

    info!(
        workflow = %workflow.name,
        directory = %directory.display(),
        "exported deployment artifacts"
    );
    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> Result<(), CommandError> {
    fs::write(path, contents).map_err(|source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    })
}
