use super::parameters::ParameterMap;
use super::resource_id::ResourceId;
use crate::error::WorkflowError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Lifecycle state of a deployed workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    NotSpecified,
    Completed,
    Enabled,
    Disabled,
    Deleted,
    Suspended,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::NotSpecified => "NotSpecified",
            WorkflowState::Completed => "Completed",
            WorkflowState::Enabled => "Enabled",
            WorkflowState::Disabled => "Disabled",
            WorkflowState::Deleted => "Deleted",
            WorkflowState::Suspended => "Suspended",
        };
        f.write_str(name)
    }
}

/// A parameter declared in a workflow definition (`definition.parameters`).
///
/// Fields other than `type` and `defaultValue` (`allowedValues`, `metadata`, ...)
/// are kept in `extra` and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    #[serde(rename = "type")]
    pub parameter_type: String,
    #[serde(
        rename = "defaultValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParameterDefinition {
    pub fn new(parameter_type: impl Into<String>, default_value: Option<Value>) -> Self {
        Self {
            parameter_type: parameter_type.into(),
            default_value,
            extra: Map::new(),
        }
    }

    pub fn string(default_value: impl Into<String>) -> Self {
        Self::new("string", Some(Value::String(default_value.into())))
    }
}

/// A value supplied for a workflow parameter (`workflow.parameters`), usually
/// left over from the most recent deployment. A `null` value counts as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterValue {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParameterValue {
    pub fn new(value: Option<Value>) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
}

/// A workflow definition: the trigger/action graph, kept verbatim, plus its
/// validated `parameters` declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowDefinition {
    document: Map<String, Value>,
    parameters: ParameterMap<ParameterDefinition>,
}

impl WorkflowDefinition {
    /// Validates `value` as a definition. It must be an object; its
    /// `parameters` member, when present and not `null`, must be an object of
    /// parameter declarations each carrying a `type`.
    pub fn from_value(value: Value) -> Result<Self, WorkflowError> {
        let document = match value {
            Value::Object(document) => document,
            other => {
                return Err(WorkflowError::definition(format!(
                    "expected a JSON object, found {}",
                    value_kind(&other)
                )));
            }
        };

        let parameters = match document.get("parameters") {
            None | Some(Value::Null) => ParameterMap::new(),
            Some(raw @ Value::Object(_)) => ParameterMap::deserialize(raw)
                .map_err(|e| WorkflowError::definition(format!("parameters: {}", e)))?,
            Some(other) => {
                return Err(WorkflowError::definition(format!(
                    "`parameters` must be an object, found {}",
                    value_kind(other)
                )));
            }
        };

        Ok(Self {
            document,
            parameters,
        })
    }

    pub fn parameters(&self) -> &ParameterMap<ParameterDefinition> {
        &self.parameters
    }

    /// The definition exactly as it was supplied.
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }
}

impl Serialize for WorkflowDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WorkflowDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        WorkflowDefinition::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// A snapshot of a Logic Apps workflow resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workflow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<WorkflowState>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub tags: Map<String, Value>,
    pub definition: WorkflowDefinition,
    pub parameters: ParameterMap<ParameterValue>,
    /// ARM `properties` members other than `definition`, `parameters` and
    /// `state` (`integrationAccount`, `accessControl`, ...), written back
    /// unchanged on update.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl Workflow {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        definition: WorkflowDefinition,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: location.into(),
            state: None,
            tags: Map::new(),
            definition,
            parameters: ParameterMap::new(),
            properties: Map::new(),
        }
    }

    /// Validates a workflow snapshot.
    ///
    /// Accepts both the flattened shape (`definition` next to `name`) and the
    /// ARM resource shape, where `definition`, `parameters` and `state` live
    /// under `properties`. A missing or `null` definition or parameter map is
    /// treated as empty. Top-level `tags` and any other `properties` members
    /// are kept.
    pub fn from_value(value: Value) -> Result<Self, WorkflowError> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(WorkflowError::definition(format!(
                    "expected a workflow object, found {}",
                    value_kind(&other)
                )));
            }
        };

        let mut properties = match object.remove("properties") {
            Some(Value::Object(properties)) => properties,
            _ => Map::new(),
        };
        for key in ["state", "definition", "parameters"] {
            if let Some(value) = properties.remove(key) {
                object.entry(key).or_insert(value);
            }
        }

        let id = match object.remove("id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id),
            Some(other) => {
                return Err(WorkflowError::definition(format!(
                    "`id` must be a string, found {}",
                    value_kind(&other)
                )));
            }
        };
        let name = take_string(&mut object, "name")?;
        let location = take_string(&mut object, "location")?;

        let state = match object.remove("state") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(
                serde_json::from_value(raw)
                    .map_err(|e| WorkflowError::definition(format!("state: {}", e)))?,
            ),
        };

        let tags = match object.remove("tags") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(tags)) => tags,
            Some(other) => {
                return Err(WorkflowError::definition(format!(
                    "`tags` must be an object, found {}",
                    value_kind(&other)
                )));
            }
        };

        let definition = match object.remove("definition") {
            None | Some(Value::Null) => WorkflowDefinition::default(),
            Some(raw) => WorkflowDefinition::from_value(raw)?,
        };

        let parameters = match object.remove("parameters") {
            None => ParameterMap::new(),
            Some(raw) => serde_json::from_value(raw).map_err(|e| {
                WorkflowError::InvalidParameterValues {
                    reason: e.to_string(),
                }
            })?,
        };

        Ok(Self {
            id,
            name,
            location,
            state,
            tags,
            definition,
            parameters,
            properties,
        })
    }

    /// Parses and validates a workflow from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, WorkflowError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| WorkflowError::definition(format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// The value supplied for `key` at the most recent deployment, if any.
    pub fn prior_value(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key).and_then(|p| p.value.as_ref())
    }

    pub fn resource_id(&self) -> Result<ResourceId, WorkflowError> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| WorkflowError::MissingResourceId(self.name.clone()))?;
        id.parse()
    }

    pub fn resource_group(&self) -> Result<String, WorkflowError> {
        self.resource_id().map(|id| id.resource_group)
    }

    /// A copy of this workflow carrying a different definition.
    pub fn with_definition(&self, definition: WorkflowDefinition) -> Self {
        Self {
            definition,
            ..self.clone()
        }
    }
}

impl<'de> Deserialize<'de> for Workflow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Workflow::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn take_string(object: &mut Map<String, Value>, field: &str) -> Result<String, WorkflowError> {
    match object.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(WorkflowError::definition(format!(
            "`{}` must be a string, found {}",
            field,
            value_kind(&other)
        ))),
        None => Err(WorkflowError::definition(format!("missing `{}`", field))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
