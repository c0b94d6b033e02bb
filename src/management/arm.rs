use super::{CallbackUrl, WorkflowClient, WorkflowTrigger};
use crate::config::ManagerConfig;
use crate::error::{ClientError, ConfigError};
use crate::workflow::{ParameterMap, ParameterValue, Workflow, WorkflowDefinition, WorkflowState};
use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_API_VERSION: &str = "2016-06-01";

/// A `WorkflowClient` backed by the Azure Resource Manager REST API.
pub struct ArmWorkflowClient {
    client: Client,
    endpoint: String,
    subscription_id: String,
    api_version: String,
    access_token: String,
}

impl ArmWorkflowClient {
    pub fn new(subscription_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            subscription_id: subscription_id.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn from_config(config: &ManagerConfig) -> Result<Self, ConfigError> {
        let (subscription_id, access_token) = config.credentials()?;
        Ok(Self::new(subscription_id, access_token)
            .with_endpoint(&config.endpoint)
            .with_api_version(&config.api_version))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    fn workflows_url(&self, resource_group: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Logic/workflows",
            self.endpoint, self.subscription_id, resource_group
        )
    }

    fn workflow_url(&self, resource_group: &str, workflow_name: &str) -> String {
        format!("{}/{}", self.workflows_url(resource_group), workflow_name)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, url, "management request");
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
            .query(&[("api-version", self.api_version.as_str())])
    }

    async fn post_empty(&self, url: &str) -> Result<Response, ClientError> {
        send(self.request(Method::POST, url).header(CONTENT_LENGTH, "0")).await
    }

    // nextLink already carries its own api-version.
    fn next_page_request(&self, next_link: &str) -> RequestBuilder {
        debug!(url = %next_link, "following nextLink");
        self.client.get(next_link).bearer_auth(&self.access_token)
    }

    /// Fetches every item of a paged collection, following `nextLink`.
    async fn collect_pages<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, ClientError> {
        let first: Page<T> = read_json(send(self.request(Method::GET, url)).await?).await?;
        follow_pages(first, |next_link| async move {
            read_json(send(self.next_page_request(&next_link)).await?).await
        })
        .await
    }
}

/// Concatenates `first` with every page reached through `nextLink`, in order.
async fn follow_pages<T, F, Fut>(first: Page<T>, mut fetch: F) -> Result<Vec<T>, ClientError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>, ClientError>>,
{
    let mut items = Vec::new();
    let mut page = first;
    loop {
        items.append(&mut page.value);
        let Some(next_link) = page.next_link.take() else {
            return Ok(items);
        };
        page = fetch(next_link).await?;
    }
}

#[async_trait]
impl WorkflowClient for ArmWorkflowClient {
    async fn list(&self, resource_group: &str) -> Result<Vec<Workflow>, ClientError> {
        let resources: Vec<Value> = self.collect_pages(&self.workflows_url(resource_group)).await?;
        resources
            .into_iter()
            .map(|resource| Workflow::from_value(resource).map_err(ClientError::from))
            .collect()
    }

    async fn get(
        &self,
        resource_group: &str,
        workflow_name: &str,
    ) -> Result<Workflow, ClientError> {
        let url = self.workflow_url(resource_group, workflow_name);
        let response = send(self.request(Method::GET, &url))
            .await
            .map_err(|e| not_found_as(e, workflow_name))?;
        let resource: Value = read_json(response).await?;
        Ok(Workflow::from_value(resource)?)
    }

    async fn create_or_update(
        &self,
        resource_group: &str,
        workflow_name: &str,
        workflow: &Workflow,
    ) -> Result<Workflow, ClientError> {
        let url = self.workflow_url(resource_group, workflow_name);
        let body = WorkflowBody::from(workflow);
        let response = send(self.request(Method::PUT, &url).json(&body)).await?;
        let resource: Value = read_json(response).await?;
        Ok(Workflow::from_value(resource)?)
    }

    async fn enable(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError> {
        let url = format!("{}/enable", self.workflow_url(resource_group, workflow_name));
        self.post_empty(&url).await?;
        Ok(())
    }

    async fn disable(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError> {
        let url = format!("{}/disable", self.workflow_url(resource_group, workflow_name));
        self.post_empty(&url).await?;
        Ok(())
    }

    async fn delete(&self, resource_group: &str, workflow_name: &str) -> Result<(), ClientError> {
        let url = self.workflow_url(resource_group, workflow_name);
        send(self.request(Method::DELETE, &url))
            .await
            .map_err(|e| not_found_as(e, workflow_name))?;
        Ok(())
    }

    async fn list_triggers(
        &self,
        resource_group: &str,
        workflow_name: &str,
    ) -> Result<Vec<WorkflowTrigger>, ClientError> {
        let url = format!("{}/triggers", self.workflow_url(resource_group, workflow_name));
        let triggers: Vec<ArmTrigger> = self.collect_pages(&url).await?;
        Ok(triggers.into_iter().map(WorkflowTrigger::from).collect())
    }

    async fn list_callback_url(
        &self,
        resource_group: &str,
        workflow_name: &str,
        trigger_name: &str,
    ) -> Result<CallbackUrl, ClientError> {
        let url = format!(
            "{}/triggers/{}/listCallbackUrl",
            self.workflow_url(resource_group, workflow_name),
            trigger_name
        );
        read_json(self.post_empty(&url).await?).await
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::Http(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    response
        .json()
        .await
        .map_err(|e| ClientError::Deserialization(e.to_string()))
}

fn not_found_as(error: ClientError, workflow_name: &str) -> ClientError {
    match error {
        ClientError::Api { status: 404, .. } => ClientError::NotFound(workflow_name.to_string()),
        other => other,
    }
}

/// Builds an `Api` error from an ARM error body (`{"error": {"code", "message"}}`),
/// falling back to the raw body text.
fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ArmErrorResponse>(body) {
        Ok(response) => ClientError::Api {
            status,
            code: response.error.code,
            message: response.error.message,
        },
        Err(_) => ClientError::Api {
            status,
            code: "Unknown".to_string(),
            message: body.trim().to_string(),
        },
    }
}

#[derive(Deserialize)]
struct ArmErrorResponse {
    error: ArmErrorBody,
}

#[derive(Deserialize)]
struct ArmErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    next_link: Option<String>,
}

#[derive(Deserialize)]
struct ArmTrigger {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    properties: ArmTriggerProperties,
}

#[derive(Deserialize, Default)]
struct ArmTriggerProperties {
    #[serde(default)]
    state: Option<WorkflowState>,
}

impl From<ArmTrigger> for WorkflowTrigger {
    fn from(trigger: ArmTrigger) -> Self {
        WorkflowTrigger {
            id: trigger.id,
            name: trigger.name,
            state: trigger.properties.state,
        }
    }
}

/// The request body of a workflow PUT.
#[derive(Serialize)]
struct WorkflowBody<'a> {
    location: &'a str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    tags: &'a Map<String, Value>,
    properties: WorkflowBodyProperties<'a>,
}

#[derive(Serialize)]
struct WorkflowBodyProperties<'a> {
    definition: &'a WorkflowDefinition,
    parameters: &'a ParameterMap<ParameterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<WorkflowState>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl<'a> From<&'a Workflow> for WorkflowBody<'a> {
    fn from(workflow: &'a Workflow) -> Self {
        WorkflowBody {
            location: &workflow.location,
            tags: &workflow.tags,
            properties: WorkflowBodyProperties {
                definition: &workflow.definition,
                parameters: &workflow.parameters,
                state: workflow.state,
                extra: &workflow.properties,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ArmWorkflowClient {
        ArmWorkflowClient::new("sub-1", "token").with_endpoint("https://arm.example/")
    }

    #[test]
    fn test_workflow_urls() {
        let client = client();
        assert_eq!(
            client.workflows_url("rg1"),
            "https://arm.example/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Logic/workflows"
        );
        assert_eq!(
            client.workflow_url("rg1", "wf1"),
            "https://arm.example/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Logic/workflows/wf1"
        );
    }

    #[test]
    fn test_api_error_reads_arm_error_body() {
        let body = r#"{"error":{"code":"WorkflowNotFound","message":"The workflow 'wf1' could not be found."}}"#;
        match api_error(404, body) {
            ClientError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "WorkflowNotFound");
                assert!(message.contains("wf1"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }

        assert!(matches!(
            not_found_as(api_error(404, body), "wf1"),
            ClientError::NotFound(name) if name == "wf1"
        ));
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        match api_error(502, "  Bad Gateway \n") {
            ClientError::Api { code, message, .. } => {
                assert_eq!(code, "Unknown");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_put_body_nests_properties() {
        let workflow = Workflow::from_value(json!({
            "id": "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Logic/workflows/wf1",
            "name": "wf1",
            "location": "westus",
            "state": "Disabled",
            "definition": { "triggers": {} },
            "parameters": { "p1": { "value": "v" } }
        }))
        .unwrap();

        let body = serde_json::to_value(WorkflowBody::from(&workflow)).unwrap();
        assert_eq!(
            body,
            json!({
                "location": "westus",
                "properties": {
                    "definition": { "triggers": {} },
                    "parameters": { "p1": { "value": "v" } },
                    "state": "Disabled"
                }
            })
        );
    }

    fn arm_workflow_response() -> Value {
        json!({
            "id": "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Logic/workflows/wf1",
            "name": "wf1",
            "type": "Microsoft.Logic/workflows",
            "location": "westus",
            "tags": { "env": "prod" },
            "properties": {
                "provisioningState": "Succeeded",
                "state": "Enabled",
                "version": "08585",
                "integrationAccount": {
                    "id": "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Logic/integrationAccounts/ia1"
                },
                "definition": { "triggers": {} },
                "parameters": {}
            }
        })
    }

    #[test]
    fn test_arm_response_is_flattened() {
        let workflow = Workflow::from_value(arm_workflow_response()).unwrap();
        assert_eq!(workflow.resource_group().unwrap(), "rg1");
        assert_eq!(workflow.state, Some(WorkflowState::Enabled));
        assert_eq!(workflow.definition.to_value(), json!({ "triggers": {} }));
        assert_eq!(workflow.tags.get("env"), Some(&json!("prod")));
        assert!(workflow.properties.contains_key("integrationAccount"));
        assert!(!workflow.properties.contains_key("definition"));
        assert!(!workflow.properties.contains_key("state"));
    }

    #[test]
    fn test_put_body_keeps_tags_and_properties() {
        let workflow = Workflow::from_value(arm_workflow_response()).unwrap();
        let edited = workflow.with_definition(
            WorkflowDefinition::from_value(json!({ "triggers": { "manual": {} } })).unwrap(),
        );

        let body = serde_json::to_value(WorkflowBody::from(&edited)).unwrap();
        assert_eq!(body["tags"], json!({ "env": "prod" }));
        assert_eq!(
            body["properties"]["integrationAccount"]["id"],
            "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Logic/integrationAccounts/ia1"
        );
        assert_eq!(body["properties"]["definition"], json!({ "triggers": { "manual": {} } }));
        assert_eq!(body["properties"]["state"], "Enabled");
    }

    fn page(values: &[i32], next_link: Option<&str>) -> Page<i32> {
        Page {
            value: values.to_vec(),
            next_link: next_link.map(str::to_string),
        }
    }

    #[test]
    fn test_follow_pages_concatenates_in_order() {
        let mut remaining = vec![page(&[5], None), page(&[3, 4], Some("https://arm.example/p3"))];
        let mut requested = Vec::new();

        let items = tokio_test::block_on(follow_pages(
            page(&[1, 2], Some("https://arm.example/p2")),
            |link| {
                requested.push(link);
                let next = remaining.pop().unwrap();
                async move { Ok(next) }
            },
        ))
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(requested, vec!["https://arm.example/p2", "https://arm.example/p3"]);
    }

    #[test]
    fn test_follow_pages_stops_on_error() {
        let result = tokio_test::block_on(follow_pages(
            page(&[1], Some("https://arm.example/p2")),
            |_| async { Err::<Page<i32>, _>(api_error(500, "boom")) },
        ));
        assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
    }

    #[test]
    fn test_next_link_is_requested_as_given() {
        let client = client();
        let next_link = "https://arm.example/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Logic/workflows?api-version=2016-06-01&%24skiptoken=abc";

        let request = client.next_page_request(next_link).build().unwrap();
        assert_eq!(request.url().as_str(), next_link);
        let versions = request
            .url()
            .query_pairs()
            .filter(|(key, _)| key == "api-version")
            .count();
        assert_eq!(versions, 1);

        let first = client
            .request(Method::GET, &client.workflows_url("rg1"))
            .build()
            .unwrap();
        assert_eq!(first.url().query(), Some("api-version=2016-06-01"));
        assert_eq!(first.headers()["authorization"], "Bearer token");
    }

    #[test]
    fn test_trigger_page_parsing() {
        let page: Page<ArmTrigger> = serde_json::from_value(json!({
            "value": [
                { "id": "t-id", "name": "manual", "properties": { "state": "Enabled" } },
                { "name": "recurrence" }
            ]
        }))
        .unwrap();
        assert!(page.next_link.is_none());

        let triggers: Vec<WorkflowTrigger> = page.value.into_iter().map(Into::into).collect();
        assert_eq!(triggers[0].state, Some(WorkflowState::Enabled));
        assert_eq!(triggers[1].name, "recurrence");
        assert_eq!(triggers[1].state, None);
    }
}
