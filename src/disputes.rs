//! Disputes (chargebacks) API client.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::{Error, Result, ValidationError},
    files::FileResponse,
    http::{impl_http_metadata_target, HttpMetadata},
    multipart::FileUploadRequest,
    types::{Currency, EmptyResponse, Links},
};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Accepted,
    Arbitration,
    Canceled,
    EvidenceRequired,
    EvidenceUnderReview,
    Expired,
    Lost,
    Received,
    Resolved,
    #[default]
    Won,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dispute {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub id: String,
    #[serde(default)]
    pub status: DisputeStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub reason_code: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub evidence_required_by: Option<DateTime<Utc>>,
    #[serde(default)]
    pub received_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

/// Filters for the disputes listing endpoint; all fields optional.
#[derive(Debug, Clone, Default)]
pub struct DisputesQuery {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub statuses: Option<Vec<DisputeStatus>>,
    pub payment_id: Option<String>,
}

impl DisputesQuery {
    fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%dT%H:%M:%SZ").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%dT%H:%M:%SZ").to_string()));
        }
        if let Some(statuses) = &self.statuses {
            let joined: Vec<String> = statuses
                .iter()
                .filter_map(|s| serde_json::to_value(s).ok())
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect();
            if !joined.is_empty() {
                pairs.push(("statuses", joined.join(",")));
            }
        }
        if let Some(payment_id) = &self.payment_id {
            pairs.push(("payment_id", payment_id.clone()));
        }
        if pairs.is_empty() {
            return String::new();
        }
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.extend_pairs(pairs);
        format!("?{}", query.finish())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisputesQueryResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub data: Vec<Dispute>,
}

/// Evidence submitted against a dispute; text fields and previously uploaded
/// file ids (`file_*`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_delivery_or_service_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_delivery_or_service_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_or_receipt_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_or_receipt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_communication_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_communication_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_or_cancellation_policy_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_or_cancellation_policy_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_evidence_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_evidence_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvidenceResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    #[serde(flatten)]
    pub evidence: Evidence,
}

impl_http_metadata_target!(Dispute, DisputesQueryResponse, EvidenceResponse);

fn validate_dispute_id(dispute_id: &str) -> Result<()> {
    if dispute_id.trim().is_empty() {
        return Err(Error::Validation(
            ValidationError::new("dispute id is required").with_field("dispute_id"),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct DisputesClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl DisputesClient {
    /// List disputes matching the query filters.
    pub async fn query(&self, query: DisputesQuery) -> Result<DisputesQueryResponse> {
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/disputes{}", query.to_query_string());
        self.inner.get(&path, authorization).await
    }

    pub async fn get_dispute_details(&self, dispute_id: &str) -> Result<Dispute> {
        validate_dispute_id(dispute_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/disputes/{dispute_id}");
        self.inner.get(&path, authorization).await
    }

    /// Accept a dispute, forfeiting the disputed amount.
    pub async fn accept(&self, dispute_id: &str) -> Result<EmptyResponse> {
        validate_dispute_id(dispute_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/disputes/{dispute_id}/accept");
        self.inner
            .post::<EmptyResponse, ()>(&path, authorization, None, None)
            .await
    }

    /// Attach or replace evidence on a dispute awaiting a response.
    pub async fn provide_evidence(&self, dispute_id: &str, evidence: Evidence) -> Result<EmptyResponse> {
        validate_dispute_id(dispute_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/disputes/{dispute_id}/evidence");
        self.inner.put(&path, authorization, Some(&evidence), None).await
    }

    pub async fn get_evidence(&self, dispute_id: &str) -> Result<EvidenceResponse> {
        validate_dispute_id(dispute_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/disputes/{dispute_id}/evidence");
        self.inner.get(&path, authorization).await
    }

    /// Submit the attached evidence for review. Irreversible.
    pub async fn submit_evidence(&self, dispute_id: &str) -> Result<EmptyResponse> {
        validate_dispute_id(dispute_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/disputes/{dispute_id}/evidence");
        self.inner
            .post::<EmptyResponse, ()>(&path, authorization, None, None)
            .await
    }

    /// Upload an evidence file for later reference in [`Evidence`] fields.
    pub async fn upload_evidence_file(&self, file: FileUploadRequest) -> Result<FileResponse> {
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let form = file.into_form().await?;
        self.inner.upload("/files", authorization, form).await
    }
}
