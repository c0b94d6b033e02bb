use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating a workflow snapshot at the crate boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Invalid workflow definition: {reason}")]
    InvalidWorkflowDefinition { reason: String },

    #[error("Invalid workflow parameter values: {reason}")]
    InvalidParameterValues { reason: String },

    #[error("'{0}' is not a valid ARM resource id")]
    InvalidResourceId(String),

    #[error("Workflow '{0}' has no resource id")]
    MissingResourceId(String),
}

impl WorkflowError {
    pub(crate) fn definition(reason: impl Into<String>) -> Self {
        WorkflowError::InvalidWorkflowDefinition {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while generating deployment artifacts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Parameter '{key}' generated for workflow '{workflow}' collides with an existing parameter")]
    ParameterNameCollision { workflow: String, key: String },

    #[error("Failed to serialize deployment artifact: {0}")]
    Serialization(String),
}

/// Errors returned by a `WorkflowClient`.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("Request to the management API failed: {0}")]
    Http(String),

    #[error("Management API returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Failed to parse management API response: {0}")]
    Deserialization(String),

    #[error("Workflow '{0}' was not found")]
    NotFound(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Errors raised by the definition editor.
#[derive(Error, Debug, Clone)]
pub enum EditorError {
    #[error("Cannot update Logic App after it has been closed.")]
    DocumentClosed,

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to render workflow definition: {0}")]
    Serialization(String),
}

/// Errors raised by the command handlers.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("Trigger '{trigger}' did not return a callback URL")]
    MissingCallbackUrl { trigger: String },

    #[error("Could not write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("No subscription id configured (set `subscription_id` or AZURE_SUBSCRIPTION_ID)")]
    MissingSubscription,

    #[error("No access token configured (set `access_token` or AZURE_ACCESS_TOKEN)")]
    MissingAccessToken,
}
