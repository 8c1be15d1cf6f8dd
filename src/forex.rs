//! Foreign exchange quotes API client.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::{Error, Result, ValidationError},
    http::{impl_http_metadata_target, HttpMetadata},
    types::Currency,
};

/// Request an exchange-rate quote. Exactly one of `source_amount` and
/// `destination_amount` must be set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuoteRequest {
    pub source_currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_amount: Option<u64>,
    pub destination_currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_channel_id: Option<String>,
}

impl QuoteRequest {
    fn validate(&self) -> Result<()> {
        match (self.source_amount, self.destination_amount) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(Error::Validation(ValidationError::new(
                "exactly one of source_amount and destination_amount is required",
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub id: String,
    #[serde(default)]
    pub source_currency: Option<Currency>,
    #[serde(default)]
    pub source_amount: Option<u64>,
    #[serde(default)]
    pub destination_currency: Option<Currency>,
    #[serde(default)]
    pub destination_amount: Option<u64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub expires_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_single_use: Option<bool>,
}

impl_http_metadata_target!(QuoteResponse);

#[derive(Clone)]
pub struct ForexClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ForexClient {
    /// Request a quote guaranteeing an exchange rate until it expires.
    pub async fn request_quote(&self, req: QuoteRequest) -> Result<QuoteResponse> {
        req.validate()?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        self.inner
            .post("/forex/quotes", authorization, Some(&req), None)
            .await
    }
}
