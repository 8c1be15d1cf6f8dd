//! Reconciliation reports API client.
//!
//! Reports come back either as JSON or as CSV, depending on the endpoint;
//! the CSV path goes through [`ContentResponse`] rather than serde.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::form_urlencoded;

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::Result,
    http::{impl_http_metadata_target, ContentResponse, HttpMetadata},
    types::{Currency, Links},
};

/// Date-bounded report query; both bounds optional.
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub reference: Option<String>,
    pub limit: Option<u32>,
}

impl ReportQuery {
    fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%dT%H:%M:%SZ").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%dT%H:%M:%SZ").to_string()));
        }
        if let Some(reference) = &self.reference {
            pairs.push(("reference", reference.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
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
pub struct PaymentReport {
    pub id: String,
    #[serde(default)]
    pub processing_currency: Option<Currency>,
    #[serde(default)]
    pub payout_currency: Option<Currency>,
    #[serde(default)]
    pub requested_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payout_id: Option<String>,
    #[serde(default)]
    pub breakdown: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentsReportResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub data: Vec<PaymentReport>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

impl_http_metadata_target!(PaymentsReportResponse);

#[derive(Clone)]
pub struct ReconciliationClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ReconciliationClient {
    /// Query the payments report as structured JSON.
    pub async fn query_payments_report(&self, query: ReportQuery) -> Result<PaymentsReportResponse> {
        let authorization = self.inner.authorization(AuthorizationType::SecretKey)?;
        let path = format!("/reporting/payments{}", query.to_query_string());
        self.inner.get(&path, authorization).await
    }

    /// Download the payments report as CSV.
    pub async fn retrieve_csv_payments_report(
        &self,
        query: ReportQuery,
    ) -> Result<ContentResponse> {
        let authorization = self.inner.authorization(AuthorizationType::SecretKey)?;
        let path = format!("/reporting/payments/download{}", query.to_query_string());
        self.inner.get_content(&path, authorization).await
    }
}
