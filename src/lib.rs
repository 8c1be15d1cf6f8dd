//! Rust SDK for the Checkout.com payments API.
#![cfg_attr(docsrs, feature(doc_cfg))]
// Allow large error types - refactoring to Box<Error> would be a breaking change
#![allow(clippy::result_large_err)]

/// Production API base URL.
pub const PRODUCTION_BASE_URL: &str = "https://api.checkout.com";

/// Sandbox API base URL.
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.checkout.com";

/// Production files API base URL.
pub const PRODUCTION_FILES_BASE_URL: &str = "https://files.checkout.com";

/// Sandbox files API base URL.
pub const SANDBOX_FILES_BASE_URL: &str = "https://files.sandbox.checkout.com";

/// Default User-Agent header value.
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("checkout-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Default connection timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Default request timeout (60 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Response header carrying the gateway-assigned request id.
pub const REQUEST_ID_HEADER: &str = "Cko-Request-Id";

/// Response header carrying the API version that served the request.
pub const VERSION_HEADER: &str = "Cko-Version";

/// Request header carrying the caller-supplied idempotency key (POST/PUT only).
pub const IDEMPOTENCY_KEY_HEADER: &str = "Cko-Idempotency-Key";

/// Request header carrying the SDK request-timing telemetry payload.
pub const SDK_TELEMETRY_HEADER: &str = "Cko-Sdk-Telemetry";

mod client;
mod credentials;
mod disputes;
mod environment;
mod errors;
mod files;
mod forex;
mod http;
mod multipart;
mod payments;
mod reconciliation;
mod telemetry;
mod tokens;
mod transfers;
mod types;
mod webhooks;
mod workflows;

pub use client::{ApiClient, Config};
pub use credentials::{
    Authorization, AuthorizationType, CredentialsProvider, OAuthCredentials,
    SessionSecretCredentials, StaticKeysCredentials,
};
pub use disputes::{
    Dispute, DisputeStatus, DisputesClient, DisputesQuery, DisputesQueryResponse, Evidence,
    EvidenceResponse,
};
pub use environment::Environment;
pub use errors::{
    ApiError, AuthorizationError, Error, Result, TransportError, TransportErrorKind,
    ValidationError,
};
pub use files::{FileResponse, FilesClient};
pub use forex::{ForexClient, QuoteRequest, QuoteResponse};
pub use http::{ContentResponse, HttpMetadata, HttpMetadataTarget, RequestOptions};
pub use multipart::FileUploadRequest;
pub use payments::{
    CaptureRequest, CaptureResponse, PaymentAction, PaymentRequest, PaymentResponse, PaymentSource,
    PaymentStatus, PaymentsClient, RefundRequest, RefundResponse, VoidRequest, VoidResponse,
};
pub use reconciliation::{
    PaymentReport, PaymentsReportResponse, ReconciliationClient, ReportQuery,
};
pub use telemetry::TelemetryRecord;
pub use tokens::{CardTokenRequest, CardTokenResponse, TokensClient};
pub use transfers::{
    TransferDestination, TransferRequest, TransferResponse, TransferSource, TransfersClient,
};
pub use types::{
    Address, Currency, CustomerSummary, EmptyResponse, ItemsResponse, Link, Links, Phone,
};
pub use webhooks::{Webhook, WebhookRequest, WebhooksClient};
pub use workflows::{Workflow, WorkflowRequest, WorkflowsClient, WorkflowsListResponse};

#[cfg(feature = "blocking")]
mod blocking;
#[cfg(feature = "blocking")]
pub use blocking::{
    BlockingApiClient, BlockingConfig, BlockingPaymentsClient, BlockingTokensClient,
};
