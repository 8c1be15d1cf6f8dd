//! DTO primitives shared across resource clients.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::http::{impl_http_metadata_target, HttpMetadata};

/// ISO 4217 currency codes accepted by the gateway (representative subset;
/// `Unknown` keeps decoding forward-compatible).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Currency {
    AED,
    AUD,
    BHD,
    BRL,
    CAD,
    CHF,
    CNY,
    DKK,
    EGP,
    #[default]
    EUR,
    GBP,
    HKD,
    INR,
    JPY,
    KWD,
    MXN,
    NOK,
    NZD,
    PLN,
    QAR,
    SAR,
    SEK,
    SGD,
    TRY,
    USD,
    ZAR,
    #[serde(other)]
    Unknown,
}

/// Postal address in the gateway's shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Two-letter ISO 3166 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Phone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// Customer reference attached to payment requests and echoed in responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// HAL link as returned under `_links`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

pub type Links = HashMap<String, Link>;

/// Response carrying only the HTTP envelope (204s, accepts, removals).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmptyResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
}

/// Wrapper for endpoints that return a bare JSON array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
}

impl_http_metadata_target!(EmptyResponse);

impl<T> crate::http::HttpMetadataTarget for ItemsResponse<T> {
    fn set_http_metadata(&mut self, metadata: HttpMetadata) {
        self.http_metadata = metadata;
    }

    fn http_metadata(&self) -> &HttpMetadata {
        &self.http_metadata
    }
}
