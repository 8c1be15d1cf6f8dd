//! Card tokenization client.
//!
//! Token requests authenticate with the public key (`pk_*`) so they can run
//! from frontends without exposing the secret key.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::{Error, Result, ValidationError},
    http::{impl_http_metadata_target, HttpMetadata},
    types::{Address, Phone},
};

/// Request to exchange card details for a single-use token.
#[derive(Debug, Clone, Serialize)]
pub struct CardTokenRequest {
    /// Always `card` on the wire.
    #[serde(rename = "type")]
    pub token_type: String,
    pub number: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

impl CardTokenRequest {
    pub fn new(number: impl Into<String>, expiry_month: u8, expiry_year: u16) -> Self {
        Self {
            token_type: "card".to_string(),
            number: number.into(),
            expiry_month,
            expiry_year,
            name: None,
            cvv: None,
            billing_address: None,
            phone: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.number.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("card number is required").with_field("number"),
            ));
        }
        if !(1..=12).contains(&self.expiry_month) {
            return Err(Error::Validation(
                ValidationError::new("expiry month must be 1-12").with_field("expiry_month"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardTokenResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    #[serde(default, rename = "type")]
    pub token_type: String,
    pub token: String,
    #[serde(default)]
    pub expires_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiry_month: Option<u8>,
    #[serde(default)]
    pub expiry_year: Option<u16>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub card_category: Option<String>,
    #[serde(default)]
    pub issuer_country: Option<String>,
}

impl_http_metadata_target!(CardTokenResponse);

#[derive(Clone)]
pub struct TokensClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl TokensClient {
    /// Exchange card details for a single-use payment token.
    pub async fn request_card_token(&self, req: CardTokenRequest) -> Result<CardTokenResponse> {
        req.validate()?;
        let authorization = self.inner.authorization(AuthorizationType::PublicKey)?;
        self.inner.post("/tokens", authorization, Some(&req), None).await
    }
}
