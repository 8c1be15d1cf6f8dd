//! Blocking client mirroring the async dispatcher for payments and tokens.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder},
    header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Method, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    credentials::{Authorization, AuthorizationType, CredentialsProvider},
    errors::{Error, Result, TransportError, ValidationError},
    http::{parse_api_error, HttpMetadata, HttpMetadataTarget, RequestOptions},
    payments::{
        CaptureRequest, CaptureResponse, PaymentRequest, PaymentResponse, RefundRequest,
        RefundResponse, VoidRequest, VoidResponse,
    },
    telemetry::{RequestMetricsQueue, TelemetryRecord},
    tokens::{CardTokenRequest, CardTokenResponse},
    Environment, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
    IDEMPOTENCY_KEY_HEADER, SDK_TELEMETRY_HEADER,
};

#[derive(Clone, Default)]
pub struct BlockingConfig {
    /// Credential set resolving per-request authorization. Required.
    pub credentials: Option<Arc<dyn CredentialsProvider>>,
    pub environment: Option<Environment>,
    pub base_url: Option<String>,
    pub http_client: Option<HttpClient>,
    /// Override the connect timeout (defaults to 5s).
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 60s).
    pub timeout: Option<Duration>,
    /// Attach `Cko-Sdk-Telemetry` request-timing headers (defaults to true).
    pub enable_telemetry: Option<bool>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct BlockingApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    credentials: Arc<dyn CredentialsProvider>,
    http: HttpClient,
    request_timeout: Duration,
    user_agent: String,
    telemetry_enabled: bool,
    metrics: RequestMetricsQueue,
}

impl BlockingApiClient {
    pub fn new(cfg: BlockingConfig) -> Result<Self> {
        let credentials = cfg
            .credentials
            .ok_or_else(|| Error::Configuration("credentials are required".into()))?;

        let environment = cfg.environment.unwrap_or_default();
        let base = cfg
            .base_url
            .unwrap_or_else(|| environment.base_url().to_string());
        let base_url = Url::parse(base.trim_end_matches('/'))
            .map_err(|err| Error::Configuration(format!("invalid base url: {err}")))?;

        let connect_timeout = cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let http = match cfg.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .connect_timeout(connect_timeout)
                .build()
                .map_err(TransportError::from_reqwest)?,
        };

        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                credentials,
                http,
                request_timeout: cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
                user_agent: cfg
                    .user_agent
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                telemetry_enabled: cfg.enable_telemetry.unwrap_or(true),
                metrics: RequestMetricsQueue::new(),
            }),
        })
    }

    pub fn payments(&self) -> BlockingPaymentsClient {
        BlockingPaymentsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn tokens(&self) -> BlockingTokensClient {
        BlockingTokensClient {
            inner: self.inner.clone(),
        }
    }
}

fn validate_payment_id(payment_id: &str) -> Result<()> {
    if payment_id.trim().is_empty() {
        return Err(Error::Validation(
            ValidationError::new("payment id is required").with_field("payment_id"),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct BlockingPaymentsClient {
    inner: Arc<ClientInner>,
}

impl BlockingPaymentsClient {
    pub fn request_payment(
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
            .send(Method::POST, "/payments", authorization, Some(&req), options)
    }

    pub fn get_payment_details(&self, payment_id: &str) -> Result<PaymentResponse> {
        validate_payment_id(payment_id)?;
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/payments/{payment_id}");
        self.inner
            .send::<PaymentResponse, ()>(Method::GET, &path, authorization, None, None)
    }

    pub fn capture_payment(
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
            .send(Method::POST, &path, authorization, Some(&req), options)
    }

    pub fn refund_payment(
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
            .send(Method::POST, &path, authorization, Some(&req), options)
    }

    pub fn void_payment(
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
            .send(Method::POST, &path, authorization, Some(&req), options)
    }
}

#[derive(Clone)]
pub struct BlockingTokensClient {
    inner: Arc<ClientInner>,
}

impl BlockingTokensClient {
    pub fn request_card_token(&self, req: CardTokenRequest) -> Result<CardTokenResponse> {
        let authorization = self.inner.authorization(AuthorizationType::PublicKey)?;
        self.inner
            .send(Method::POST, "/tokens", authorization, Some(&req), None)
    }
}

impl ClientInner {
    fn authorization(&self, authorization_type: AuthorizationType) -> Result<Authorization> {
        self.credentials.get_authorization(authorization_type)
    }

    fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        authorization: Authorization,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
        B: Serialize + ?Sized,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| Error::Configuration(format!("invalid path: {err}")))?;
        let options = options.unwrap_or_default();

        let mut builder: RequestBuilder = self
            .http
            .request(method, url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization.header_value())
            .timeout(options.timeout.unwrap_or(self.request_timeout));

        if let Some(key) = options.idempotency_key.as_deref() {
            if !key.trim().is_empty() {
                let value = HeaderValue::from_str(key).map_err(|err| {
                    Error::Configuration(format!("invalid idempotency key: {err}"))
                })?;
                builder = builder.header(IDEMPOTENCY_KEY_HEADER, value);
            }
        }

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(Error::Serialization)?;
            builder = builder.body(bytes);
        }

        let current_id = self.telemetry_enabled.then(|| Uuid::new_v4().to_string());
        if let Some(current_id) = &current_id {
            if let Some(mut record) = self.metrics.dequeue() {
                record.request_id = current_id.clone();
                let payload = serde_json::to_string(&record).map_err(Error::Serialization)?;
                builder = builder.header(SDK_TELEMETRY_HEADER, payload);
            }
        }

        let start = Instant::now();
        let response = builder
            .send()
            .map_err(|err| Error::Transport(TransportError::from_reqwest(err)))?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if let Some(current_id) = current_id {
            self.metrics.enqueue(TelemetryRecord {
                prev_request_id: current_id.clone(),
                request_id: current_id,
                prev_request_duration: elapsed_ms,
            });
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().map_err(TransportError::from_reqwest)?;

        if status.as_u16() >= 400 {
            return Err(parse_api_error(status, &headers, &bytes));
        }

        let mut payload: T = if bytes.is_empty() {
            T::default()
        } else {
            serde_json::from_slice(&bytes).map_err(Error::Serialization)?
        };
        payload.set_http_metadata(HttpMetadata::from_parts(status, &headers, bytes.to_vec()));
        Ok(payload)
    }
}
