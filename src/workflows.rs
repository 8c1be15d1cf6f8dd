//! Workflows API client (event-driven automation rules).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::{Error, Result, ValidationError},
    http::{impl_http_metadata_target, HttpMetadata},
    types::{EmptyResponse, Links},
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Trigger conditions, in the gateway's JSON shape.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<serde_json::Value>,
    /// Actions executed when the conditions match.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workflow {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub conditions: Vec<serde_json::Value>,
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowsListResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    #[serde(default)]
    pub data: Vec<Workflow>,
}

impl_http_metadata_target!(Workflow, WorkflowsListResponse);

fn validate_workflow_id(workflow_id: &str) -> Result<()> {
    if workflow_id.trim().is_empty() {
        return Err(Error::Validation(
            ValidationError::new("workflow id is required").with_field("workflow_id"),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct WorkflowsClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl WorkflowsClient {
    pub async fn get_workflows(&self) -> Result<WorkflowsListResponse> {
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        self.inner.get("/workflows", authorization).await
    }

    pub async fn get_workflow(&self, workflow_id: &str) -> Result<Workflow> {
        validate_workflow_id(workflow_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/workflows/{workflow_id}");
        self.inner.get(&path, authorization).await
    }

    pub async fn add_workflow(&self, req: WorkflowRequest) -> Result<Workflow> {
        if req.name.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("name is required").with_field("name"),
            ));
        }
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        self.inner
            .post("/workflows", authorization, Some(&req), None)
            .await
    }

    pub async fn remove_workflow(&self, workflow_id: &str) -> Result<EmptyResponse> {
        validate_workflow_id(workflow_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/workflows/{workflow_id}");
        self.inner.delete(&path, authorization).await
    }
}
