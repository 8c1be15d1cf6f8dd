use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{
    header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Method, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    credentials::{Authorization, AuthorizationType, CredentialsProvider},
    disputes::DisputesClient,
    errors::{Error, Result, TransportError},
    files::FilesClient,
    forex::ForexClient,
    http::{
        classify_content_type, parse_api_error, BodyKind, ContentResponse, HttpMetadata,
        HttpMetadataTarget, RequestOptions,
    },
    payments::PaymentsClient,
    reconciliation::ReconciliationClient,
    telemetry::{RequestMetricsQueue, TelemetryRecord},
    tokens::TokensClient,
    transfers::TransfersClient,
    webhooks::WebhooksClient,
    workflows::WorkflowsClient,
    Environment, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
    IDEMPOTENCY_KEY_HEADER, SDK_TELEMETRY_HEADER,
};

/// Client configuration. Unset fields fall back to defaults in [`ApiClient::new`].
#[derive(Clone, Default)]
pub struct Config {
    /// Credential set resolving per-request authorization. Required.
    pub credentials: Option<Arc<dyn CredentialsProvider>>,
    /// Environment preset (defaults to production). `base_url` takes precedence when set.
    pub environment: Option<Environment>,
    pub base_url: Option<String>,
    pub files_base_url: Option<String>,
    pub http_client: Option<reqwest::Client>,
    /// Override the connect timeout (defaults to 5s).
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 60s).
    pub timeout: Option<Duration>,
    /// Attach `Cko-Sdk-Telemetry` request-timing headers (defaults to true).
    pub enable_telemetry: Option<bool>,
    /// Override the User-Agent header value.
    pub user_agent: Option<String>,
}

/// Shared dispatcher behind every resource client.
///
/// Cheap to clone; all clones share one HTTP connection pool and one
/// telemetry queue.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    base_url: Url,
    files_base_url: Url,
    credentials: Arc<dyn CredentialsProvider>,
    http: reqwest::Client,
    request_timeout: Duration,
    user_agent: String,
    telemetry_enabled: bool,
    metrics: RequestMetricsQueue,
}

impl ApiClient {
    pub fn new(cfg: Config) -> Result<Self> {
        let credentials = cfg
            .credentials
            .ok_or_else(|| Error::Configuration("credentials are required".into()))?;

        let environment = cfg.environment.unwrap_or_default();
        let base_url = parse_base_url(
            cfg.base_url
                .as_deref()
                .unwrap_or_else(|| environment.base_url()),
        )?;
        let files_base_url = parse_base_url(
            cfg.files_base_url
                .as_deref()
                .unwrap_or_else(|| environment.files_base_url()),
        )?;

        let connect_timeout = cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let request_timeout = cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http = match cfg.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .build()
                .map_err(TransportError::from_reqwest)?,
        };

        let user_agent = cfg
            .user_agent
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                files_base_url,
                credentials,
                http,
                request_timeout,
                user_agent,
                telemetry_enabled: cfg.enable_telemetry.unwrap_or(true),
                metrics: RequestMetricsQueue::new(),
            }),
        })
    }

    pub fn payments(&self) -> PaymentsClient {
        PaymentsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn tokens(&self) -> TokensClient {
        TokensClient {
            inner: self.inner.clone(),
        }
    }

    pub fn disputes(&self) -> DisputesClient {
        DisputesClient {
            inner: self.inner.clone(),
        }
    }

    pub fn webhooks(&self) -> WebhooksClient {
        WebhooksClient {
            inner: self.inner.clone(),
        }
    }

    pub fn workflows(&self) -> WorkflowsClient {
        WorkflowsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn forex(&self) -> ForexClient {
        ForexClient {
            inner: self.inner.clone(),
        }
    }

    pub fn transfers(&self) -> TransfersClient {
        TransfersClient {
            inner: self.inner.clone(),
        }
    }

    pub fn files(&self) -> FilesClient {
        FilesClient {
            inner: self.inner.clone(),
        }
    }

    pub fn reconciliation(&self) -> ReconciliationClient {
        ReconciliationClient {
            inner: self.inner.clone(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim_end_matches('/');
    Url::parse(trimmed).map_err(|err| Error::Configuration(format!("invalid base url: {err}")))
}

/// Which base URI a request targets.
#[derive(Clone, Copy)]
pub(crate) enum RequestBase {
    Api,
    Files,
}

enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Multipart(reqwest::multipart::Form),
}

impl ClientInner {
    pub(crate) fn authorization(
        &self,
        authorization_type: AuthorizationType,
    ) -> Result<Authorization> {
        self.credentials.get_authorization(authorization_type)
    }

    pub(crate) async fn get<T>(&self, path: &str, authorization: Authorization) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
    {
        self.send(RequestBase::Api, Method::GET, path, authorization, RequestBody::Empty, None)
            .await
    }

    /// GET for non-JSON bodies (CSV reports, plain text); decodes by Content-Type.
    pub(crate) async fn get_content(
        &self,
        path: &str,
        authorization: Authorization,
    ) -> Result<ContentResponse> {
        let response = self
            .dispatch(RequestBase::Api, Method::GET, path, authorization, RequestBody::Empty, None)
            .await?;
        self.process_content(response).await
    }

    pub(crate) async fn post<T, B>(
        &self,
        path: &str,
        authorization: Authorization,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
        B: Serialize + ?Sized,
    {
        let body = encode_json(body)?;
        self.send(RequestBase::Api, Method::POST, path, authorization, body, options)
            .await
    }

    pub(crate) async fn put<T, B>(
        &self,
        path: &str,
        authorization: Authorization,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
        B: Serialize + ?Sized,
    {
        let body = encode_json(body)?;
        self.send(RequestBase::Api, Method::PUT, path, authorization, body, options)
            .await
    }

    pub(crate) async fn patch<T, B>(
        &self,
        path: &str,
        authorization: Authorization,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
        B: Serialize + ?Sized,
    {
        let body = encode_json(body)?;
        self.send(RequestBase::Api, Method::PATCH, path, authorization, body, None)
            .await
    }

    pub(crate) async fn delete<T>(&self, path: &str, authorization: Authorization) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
    {
        self.send(RequestBase::Api, Method::DELETE, path, authorization, RequestBody::Empty, None)
            .await
    }

    /// POST a prepared multipart form to the files host.
    pub(crate) async fn upload<T>(
        &self,
        path: &str,
        authorization: Authorization,
        form: reqwest::multipart::Form,
    ) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
    {
        self.send(
            RequestBase::Files,
            Method::POST,
            path,
            authorization,
            RequestBody::Multipart(form),
            None,
        )
        .await
    }

    pub(crate) async fn get_files<T>(&self, path: &str, authorization: Authorization) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
    {
        self.send(RequestBase::Files, Method::GET, path, authorization, RequestBody::Empty, None)
            .await
    }

    async fn send<T>(
        &self,
        base: RequestBase,
        method: Method,
        path: &str,
        authorization: Authorization,
        body: RequestBody,
        options: Option<RequestOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
    {
        let response = self
            .dispatch(base, method, path, authorization, body, options)
            .await?;
        self.process_response(response).await
    }

    /// One HTTP exchange: build, stamp telemetry, dispatch, record timing.
    async fn dispatch(
        &self,
        base: RequestBase,
        method: Method,
        path: &str,
        authorization: Authorization,
        body: RequestBody,
        options: Option<RequestOptions>,
    ) -> Result<reqwest::Response> {
        let url = self.url_for(base, path)?;
        let options = options.unwrap_or_default();

        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("checkout.http", method = %method, path = %path);
        #[cfg(feature = "tracing")]
        let _guard = span.enter();

        let mut builder = self
            .http
            .request(method, url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
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

        // Content-Type is sent even on bodyless requests; the gateway expects it.
        builder = match body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(bytes) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(bytes),
            // reqwest sets the multipart boundary Content-Type itself
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let current_id = self.telemetry_enabled.then(|| Uuid::new_v4().to_string());
        if let Some(current_id) = &current_id {
            // Ship the previous request's timing, labeled with this request's
            // id so the server can link consecutive requests.
            if let Some(mut record) = self.metrics.dequeue() {
                record.request_id = current_id.clone();
                let payload = serde_json::to_string(&record).map_err(Error::Serialization)?;
                builder = builder.header(SDK_TELEMETRY_HEADER, payload);
            }
        }

        let start = Instant::now();
        let result = builder.send().await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                if let Some(current_id) = current_id {
                    self.metrics.enqueue(TelemetryRecord {
                        prev_request_id: current_id.clone(),
                        request_id: current_id,
                        prev_request_duration: elapsed_ms,
                    });
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    status = %response.status(),
                    elapsed_ms,
                    "request completed"
                );
                Ok(response)
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, elapsed_ms, "transport error");
                Err(TransportError::from_reqwest(err).into())
            }
        }
    }

    /// Classifies the response: structured error on status >= 400, otherwise a
    /// decoded payload with its metadata envelope filled in.
    async fn process_response<T>(&self, response: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned + HttpMetadataTarget + Default,
    {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(TransportError::from_reqwest)?;

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

    async fn process_content(&self, response: reqwest::Response) -> Result<ContentResponse> {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(TransportError::from_reqwest)?;

        if status.as_u16() >= 400 {
            return Err(parse_api_error(status, &headers, &bytes));
        }

        let content = match classify_content_type(&headers) {
            BodyKind::Json | BodyKind::Csv | BodyKind::Text => {
                String::from_utf8_lossy(&bytes).into_owned()
            }
            // Binary bodies (PDF exports) stay in the metadata byte buffer.
            BodyKind::Binary => String::new(),
        };
        Ok(ContentResponse {
            http_metadata: HttpMetadata::from_parts(status, &headers, bytes.to_vec()),
            content,
        })
    }

    fn url_for(&self, base: RequestBase, path: &str) -> Result<Url> {
        let base = match base {
            RequestBase::Api => &self.base_url,
            RequestBase::Files => &self.files_base_url,
        };
        base.join(path)
            .map_err(|err| Error::Configuration(format!("invalid path: {err}")))
    }
}

fn encode_json<B: Serialize + ?Sized>(body: Option<&B>) -> Result<RequestBody> {
    match body {
        Some(body) => {
            let bytes = serde_json::to_vec(body).map_err(Error::Serialization)?;
            Ok(RequestBody::Json(bytes))
        }
        None => Ok(RequestBody::Empty),
    }
}
