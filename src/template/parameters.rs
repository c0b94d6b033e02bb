use crate::error::TemplateError;
use crate::naming::{name_parameter, normalize_resource_name, qualified_parameter};
use crate::workflow::{ParameterDefinition, ParameterMap, ParameterValue, Workflow};
use serde_json::Value;
use tracing::debug;

/// Builds the `parameters` section of a deployment template for `workflow`.
///
/// The result holds the workflow name parameter followed by one renamed entry
/// per definition parameter, in declaration order. A value supplied at the
/// previous deployment takes precedence over the definition's `defaultValue`.
pub fn generate_template_parameter_definition(
    workflow: &Workflow,
) -> Result<ParameterMap<ParameterDefinition>, TemplateError> {
    let mut definitions = ParameterMap::new();
    insert_qualified(
        &mut definitions,
        workflow,
        name_parameter(&workflow.name),
        ParameterDefinition::string(normalize_resource_name(&workflow.name)),
    )?;

    for (key, declared) in workflow.definition.parameters().iter() {
        let default_value = workflow
            .prior_value(key)
            .or(declared.default_value.as_ref())
            .cloned();
        let definition = ParameterDefinition {
            default_value,
            ..declared.clone()
        };
        insert_qualified(
            &mut definitions,
            workflow,
            qualified_parameter(&workflow.name, key),
            definition,
        )?;
    }

    debug!(
        workflow = %workflow.name,
        parameters = definitions.len(),
        "generated template parameter definitions"
    );
    Ok(definitions)
}

/// Builds the `parameters` section of a deployment parameters file for
/// `workflow`, keyed exactly like [`generate_template_parameter_definition`].
///
/// Entries with neither a prior value nor a `defaultValue` carry no `value`.
pub fn generate_template_parameter(
    workflow: &Workflow,
) -> Result<ParameterMap<ParameterValue>, TemplateError> {
    let mut values = ParameterMap::new();
    insert_qualified(
        &mut values,
        workflow,
        name_parameter(&workflow.name),
        ParameterValue::new(Some(Value::String(normalize_resource_name(
            &workflow.name,
        )))),
    )?;

    for (key, declared) in workflow.definition.parameters().iter() {
        let value = workflow
            .prior_value(key)
            .or(declared.default_value.as_ref())
            .cloned();
        insert_qualified(
            &mut values,
            workflow,
            qualified_parameter(&workflow.name, key),
            ParameterValue::new(value),
        )?;
    }

    Ok(values)
}

pub(crate) fn insert_qualified<V>(
    map: &mut ParameterMap<V>,
    workflow: &Workflow,
    key: String,
    value: V,
) -> Result<(), TemplateError> {
    map.insert_unique(key, value)
        .map_err(|key| TemplateError::ParameterNameCollision {
            workflow: workflow.name.clone(),
            key,
        })
}
