//! Normalization of workflow and parameter names into ARM-legal identifiers,
//! and the qualified-name convention used by the template generator.
//!
//! Every parameter emitted into a deployment template is prefixed with the
//! owning workflow's name, so several workflows can be deployed from a single
//! template without their parameters clashing:
//!
//! * the workflow resource name becomes `workflows_<workflow>_name`
//! * a definition parameter `key` becomes `workflows_<workflow>_parameters_<key>`
//!
//! Both forms are passed through [`normalize_parameter_name`].

/// Replaces every character that is not legal in an ARM template parameter
/// identifier with `_`. Idempotent.
pub fn normalize_parameter_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Replaces every character that is not legal in a Logic Apps resource name
/// with `-`. Idempotent.
pub fn normalize_resource_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '(' | ')') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// The template parameter holding the workflow's resource name.
pub fn name_parameter(workflow_name: &str) -> String {
    normalize_parameter_name(&format!("workflows_{}_name", workflow_name))
}

/// The template parameter standing in for definition parameter `key`.
pub fn qualified_parameter(workflow_name: &str, key: &str) -> String {
    normalize_parameter_name(&format!("workflows_{}_parameters_{}", workflow_name, key))
}

/// An ARM template expression that reads the given template parameter.
pub fn parameter_reference(qualified_name: &str) -> String {
    format!("[parameters('{}')]", qualified_name)
}
