//! Webhook configuration API client.

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::{Error, Result, ValidationError},
    http::{impl_http_metadata_target, HttpMetadata},
    types::{EmptyResponse, ItemsResponse, Links},
};

/// Request body for registering or updating a webhook endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Gateway event types this endpoint subscribes to.
    pub event_types: Vec<String>,
}

impl WebhookRequest {
    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("url is required").with_field("url"),
            ));
        }
        if self.event_types.is_empty() {
            return Err(Error::Validation(
                ValidationError::new("at least one event type is required")
                    .with_field("event_types"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Webhook {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub event_types: Vec<String>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

impl_http_metadata_target!(Webhook);

fn validate_webhook_id(webhook_id: &str) -> Result<()> {
    if webhook_id.trim().is_empty() {
        return Err(Error::Validation(
            ValidationError::new("webhook id is required").with_field("webhook_id"),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct WebhooksClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl WebhooksClient {
    /// List all configured webhook endpoints. The endpoint returns a bare
    /// array; the wrapper carries the HTTP envelope.
    pub async fn retrieve_webhooks(&self) -> Result<ItemsResponse<Webhook>> {
        let authorization = self.inner.authorization(AuthorizationType::SecretKey)?;
        self.inner.get("/webhooks", authorization).await
    }

    pub async fn register_webhook(&self, req: WebhookRequest) -> Result<Webhook> {
        req.validate()?;
        let authorization = self.inner.authorization(AuthorizationType::SecretKey)?;
        self.inner
            .post("/webhooks", authorization, Some(&req), None)
            .await
    }

    pub async fn retrieve_webhook(&self, webhook_id: &str) -> Result<Webhook> {
        validate_webhook_id(webhook_id)?;
        let authorization = self.inner.authorization(AuthorizationType::SecretKey)?;
        let path = format!("/webhooks/{webhook_id}");
        self.inner.get(&path, authorization).await
    }

    /// Replace a webhook's full configuration.
    pub async fn update_webhook(&self, webhook_id: &str, req: WebhookRequest) -> Result<Webhook> {
        validate_webhook_id(webhook_id)?;
        req.validate()?;
        let authorization = self.inner.authorization(AuthorizationType::SecretKey)?;
        let path = format!("/webhooks/{webhook_id}");
        self.inner.put(&path, authorization, Some(&req), None).await
    }

    /// Update part of a webhook's configuration.
    pub async fn partially_update_webhook(
        &self,
        webhook_id: &str,
        req: WebhookRequest,
    ) -> Result<Webhook> {
        validate_webhook_id(webhook_id)?;
        let authorization = self.inner.authorization(AuthorizationType::SecretKey)?;
        let path = format!("/webhooks/{webhook_id}");
        self.inner.patch(&path, authorization, Some(&req)).await
    }

    pub async fn remove_webhook(&self, webhook_id: &str) -> Result<EmptyResponse> {
        validate_webhook_id(webhook_id)?;
        let authorization = self.inner.authorization(AuthorizationType::SecretKey)?;
        let path = format!("/webhooks/{webhook_id}");
        self.inner.delete(&path, authorization).await
    }
}
