use crate::error::WorkflowError;
use std::fmt;
use std::str::FromStr;

const WORKFLOW_PROVIDER: &str = "Microsoft.Logic";
const WORKFLOW_TYPE: &str = "workflows";

/// A parsed workflow resource id of the form
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Logic/workflows/{name}`.
///
/// Labels, provider and type match case-insensitively; ids of any other
/// resource type are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub subscription_id: String,
    pub resource_group: String,
    pub provider: String,
    pub resource_type: String,
    pub name: String,
}

impl ResourceId {
    pub fn workflow(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            provider: WORKFLOW_PROVIDER.to_string(),
            resource_type: WORKFLOW_TYPE.to_string(),
            name: name.into(),
        }
    }
}

impl FromStr for ResourceId {
    type Err = WorkflowError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let invalid = || WorkflowError::InvalidResourceId(id.to_string());
        let segments: Vec<&str> = id.trim_matches('/').split('/').collect();

        let [
            subscriptions,
            subscription_id,
            groups,
            resource_group,
            providers,
            provider,
            resource_type,
            name,
        ] = segments.as_slice()
        else {
            return Err(invalid());
        };

        let labels_match = subscriptions.eq_ignore_ascii_case("subscriptions")
            && groups.eq_ignore_ascii_case("resourceGroups")
            && providers.eq_ignore_ascii_case("providers")
            && provider.eq_ignore_ascii_case(WORKFLOW_PROVIDER)
            && resource_type.eq_ignore_ascii_case(WORKFLOW_TYPE);
        if !labels_match || segments.iter().any(|s| s.is_empty()) {
            return Err(invalid());
        }

        Ok(Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            provider: provider.to_string(),
            resource_type: resource_type.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
            self.subscription_id, self.resource_group, self.provider, self.resource_type, self.name
        )
    }
}
