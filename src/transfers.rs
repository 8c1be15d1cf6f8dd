//! Transfers API client (moving funds between entities).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::{Error, Result, ValidationError},
    http::{impl_http_metadata_target, HttpMetadata, RequestOptions},
    types::{Currency, Links},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferSource {
    pub id: String,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferDestination {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransferRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// `commission`, `promotion` or `refund`.
    pub transfer_type: String,
    pub source: TransferSource,
    pub destination: TransferDestination,
}

impl TransferRequest {
    fn validate(&self) -> Result<()> {
        if self.transfer_type.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("transfer type is required").with_field("transfer_type"),
            ));
        }
        if self.source.id.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("source entity id is required").with_field("source.id"),
            ));
        }
        if self.destination.id.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("destination entity id is required")
                    .with_field("destination.id"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub transfer_type: Option<String>,
    #[serde(default)]
    pub requested_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<TransferSource>,
    #[serde(default)]
    pub destination: Option<TransferDestination>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

impl_http_metadata_target!(TransferResponse);

#[derive(Clone)]
pub struct TransfersClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl TransfersClient {
    /// Initiate a transfer. An idempotency key is strongly recommended since
    /// transfers move funds.
    pub async fn initiate_transfer(
        &self,
        req: TransferRequest,
        options: Option<RequestOptions>,
    ) -> Result<TransferResponse> {
        req.validate()?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        self.inner
            .post("/transfers", authorization, Some(&req), options)
            .await
    }

    pub async fn get_transfer_details(&self, transfer_id: &str) -> Result<TransferResponse> {
        if transfer_id.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("transfer id is required").with_field("transfer_id"),
            ));
        }
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/transfers/{transfer_id}");
        self.inner.get(&path, authorization).await
    }
}
