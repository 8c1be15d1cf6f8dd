//! Payments API client.
//!
//! Requires a secret key (`sk_*`) or an OAuth token with the payments scope.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::{Error, Result, ValidationError},
    http::{impl_http_metadata_target, HttpMetadata, RequestOptions},
    types::{Currency, CustomerSummary, ItemsResponse, Links},
};

/// Funding source of a payment request, tagged by `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentSource {
    /// A card token obtained via [`crate::TokensClient::request_card_token`].
    Token { token: String },
    /// Full card details (PCI-compliant merchants only).
    Card {
        number: String,
        expiry_month: u8,
        expiry_year: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cvv: Option<String>,
    },
    /// A stored payment instrument (`src_*`).
    Id { id: String },
}

/// Payment lifecycle states reported by the gateway.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Authorized,
    Canceled,
    Captured,
    #[serde(rename = "Card Verified")]
    CardVerified,
    Declined,
    Expired,
    Paid,
    #[serde(rename = "Partially Captured")]
    PartiallyCaptured,
    #[serde(rename = "Partially Refunded")]
    PartiallyRefunded,
    #[default]
    Pending,
    Refunded,
    Voided,
    #[serde(other)]
    Unknown,
}

/// Request to authorize a payment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PaymentSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Auto-capture toggle; the gateway defaults to true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub id: String,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub response_code: Option<String>,
    #[serde(default)]
    pub response_summary: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerSummary>,
    #[serde(default)]
    pub processed_on: Option<DateTime<Utc>>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

/// One entry of a payment's action history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentAction {
    pub id: String,
    #[serde(default, rename = "type")]
    pub action_type: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub response_code: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub processed_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CaptureRequest {
    /// Partial capture amount; omitted means full capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub action_id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RefundRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefundResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub action_id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VoidRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoidResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub action_id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

impl_http_metadata_target!(
    PaymentResponse,
    CaptureResponse,
    RefundResponse,
    VoidResponse,
);

fn validate_payment_id(payment_id: &str) -> Result<()> {
    if payment_id.trim().is_empty() {
        return Err(Error::Validation(
            ValidationError::new("payment id is required").with_field("payment_id"),
        ));
    }
    Ok(())
}

/// Client for payment authorization and lifecycle operations.
#[derive(Clone)]
pub struct PaymentsClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl PaymentsClient {
    /// Request a payment. Supply a [`RequestOptions`] idempotency key when
    /// retrying submissions.
    pub async fn request_payment(
        &self,
        req: PaymentRequest,
        options: Option<RequestOptions>,
    ) -> Result<PaymentResponse> {
        if req.source.is_none() {
            return Err(Error::Validation(
                ValidationError::new("a payment source is required").with_field("source"),
            ));
        }
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        self.inner
            .post("/payments", authorization, Some(&req), options)
            .await
    }

    /// Get details for a payment or payment session.
    pub async fn get_payment_details(&self, payment_id: &str) -> Result<PaymentResponse> {
        validate_payment_id(payment_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/payments/{payment_id}");
        self.inner.get(&path, authorization).await
    }

    /// List all actions (authorizations, captures, refunds, voids) of a payment.
    /// The endpoint returns a bare array; the wrapper carries the HTTP envelope.
    pub async fn get_payment_actions(
        &self,
        payment_id: &str,
    ) -> Result<ItemsResponse<PaymentAction>> {
        validate_payment_id(payment_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/payments/{payment_id}/actions");
        self.inner.get(&path, authorization).await
    }

    /// Capture an authorized payment, fully or partially.
    pub async fn capture_payment(
        &self,
        payment_id: &str,
        req: CaptureRequest,
        options: Option<RequestOptions>,
    ) -> Result<CaptureResponse> {
        validate_payment_id(payment_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/payments/{payment_id}/captures");
        self.inner
            .post(&path, authorization, Some(&req), options)
            .await
    }

    /// Refund a captured payment, fully or partially.
    pub async fn refund_payment(
        &self,
        payment_id: &str,
        req: RefundRequest,
        options: Option<RequestOptions>,
    ) -> Result<RefundResponse> {
        validate_payment_id(payment_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/payments/{payment_id}/refunds");
        self.inner
            .post(&path, authorization, Some(&req), options)
            .await
    }

    /// Void an authorization that has not been captured.
    pub async fn void_payment(
        &self,
        payment_id: &str,
        req: VoidRequest,
        options: Option<RequestOptions>,
    ) -> Result<VoidResponse> {
        validate_payment_id(payment_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/payments/{payment_id}/voids");
        self.inner
            .post(&path, authorization, Some(&req), options)
            .await
    }

    /// Increment the authorized amount of an estimated authorization.
    pub async fn increment_authorization(
        &self,
        payment_id: &str,
        req: CaptureRequest,
        options: Option<RequestOptions>,
    ) -> Result<CaptureResponse> {
        validate_payment_id(payment_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/payments/{payment_id}/authorizations");
        self.inner
            .post(&path, authorization, Some(&req), options)
            .await
    }
}
