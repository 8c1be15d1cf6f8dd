//! Dispatcher and response-processor tests using a wiremock mock server.
//!
//! These verify:
//! - Header construction (User-Agent, Accept, Authorization, idempotency key)
//! - Error classification for status >= 400
//! - Metadata injection on success, including empty bodies
//! - Fail-fast paths that never reach the network

use std::sync::Arc;

use checkout_sdk::{
    ApiClient, CaptureRequest, Config, CredentialsProvider, Currency, Error, PaymentRequest,
    PaymentSource, RequestOptions, StaticKeysCredentials,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET_KEY: &str = "sk_sbox_m73dzbpy7cf3gfd46xr4yj5xo4e";
const PUBLIC_KEY: &str = "pk_sbox_pkhpdtvabcf7hdgpwnbhw7r2uic";

/// Helper to create a client pointing at the mock server.
fn client_for_server(server: &MockServer) -> ApiClient {
    let credentials: Arc<dyn CredentialsProvider> = Arc::new(
        StaticKeysCredentials::with_keys(Some(SECRET_KEY.into()), Some(PUBLIC_KEY.into()))
            .expect("credentials should be valid"),
    );
    ApiClient::new(Config {
        credentials: Some(credentials),
        base_url: Some(server.uri()),
        files_base_url: Some(server.uri()),
        ..Default::default()
    })
    .expect("client creation should succeed")
}

fn token_payment_request() -> PaymentRequest {
    PaymentRequest {
        source: Some(PaymentSource::Token {
            token: "tok_4gzeau5o2uqubbk6fufs3m7p54".into(),
        }),
        amount: Some(6500),
        currency: Currency::GBP,
        reference: Some("ORD-5023-4E89".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn successful_payment_round_trip_injects_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments"))
        .and(header("user-agent", concat!("checkout-sdk-rust/", env!("CARGO_PKG_VERSION"))))
        .and(header("accept", "application/json"))
        .and(header("authorization", format!("Bearer {SECRET_KEY}")))
        .and(body_json(json!({
            "source": { "type": "token", "token": "tok_4gzeau5o2uqubbk6fufs3m7p54" },
            "amount": 6500,
            "currency": "GBP",
            "reference": "ORD-5023-4E89"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Cko-Request-Id", "req_abc123")
                .insert_header("Cko-Version", "3.0")
                .set_body_json(json!({
                    "id": "pay_123",
                    "approved": true,
                    "status": "Authorized",
                    "reference": "ORD-5023-4E89"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server);
    let payment = client
        .payments()
        .request_payment(token_payment_request(), None)
        .await
        .expect("payment should succeed");

    assert_eq!(payment.id, "pay_123");
    assert!(payment.approved);
    assert_eq!(payment.http_metadata.status_code, 201);
    assert_eq!(payment.http_metadata.request_id.as_deref(), Some("req_abc123"));
    assert_eq!(payment.http_metadata.version.as_deref(), Some("3.0"));
}

#[tokio::test]
async fn status_422_yields_structured_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "request_id": "r1",
            "error_type": "request_invalid",
            "error_codes": ["x"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server);
    let err = client
        .payments()
        .request_payment(token_payment_request(), None)
        .await
        .expect_err("422 should surface as an error");

    let Error::Api(api) = err else {
        panic!("expected Error::Api, got {err:?}");
    };
    assert_eq!(api.status_code, 422);
    assert_eq!(api.request_id.as_deref(), Some("r1"));
    assert_eq!(api.error_type.as_deref(), Some("request_invalid"));
    assert_eq!(api.error_codes, vec!["x"]);
}

#[tokio::test]
async fn empty_body_success_populates_metadata_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/disputes/dsp_1/accept"))
        .respond_with(ResponseTemplate::new(204).insert_header("Cko-Request-Id", "req_204"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server);
    let resp = client
        .disputes()
        .accept("dsp_1")
        .await
        .expect("accept should succeed");

    assert_eq!(resp.http_metadata.status_code, 204);
    assert_eq!(resp.http_metadata.request_id.as_deref(), Some("req_204"));
    assert!(resp.http_metadata.body.is_empty());
}

#[tokio::test]
async fn idempotency_key_is_sent_on_capture() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/pay_123/captures"))
        .and(header("cko-idempotency-key", "ik-qj8e4virrd"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({ "action_id": "act_456" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server);
    let capture = client
        .payments()
        .capture_payment(
            "pay_123",
            CaptureRequest::default(),
            Some(RequestOptions::default().with_idempotency_key("ik-qj8e4virrd")),
        )
        .await
        .expect("capture should succeed");

    assert_eq!(capture.action_id, "act_456");
    assert_eq!(capture.http_metadata.status_code, 202);
}

#[tokio::test]
async fn authorization_failure_short_circuits_before_network() {
    let server = MockServer::start().await;

    // No call must reach the server when the credential kind is unsupported.
    Mock::given(method("POST"))
        .and(path("/payments"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let credentials: Arc<dyn CredentialsProvider> = Arc::new(
        StaticKeysCredentials::public_only(PUBLIC_KEY).expect("credentials should be valid"),
    );
    let client = ApiClient::new(Config {
        credentials: Some(credentials),
        base_url: Some(server.uri()),
        ..Default::default()
    })
    .expect("client creation should succeed");

    let err = client
        .payments()
        .request_payment(token_payment_request(), None)
        .await
        .expect_err("secret-key operation must fail for a public-only client");
    assert!(matches!(err, Error::Authorization(_)));
}

#[tokio::test]
async fn missing_payment_source_fails_validation_before_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for_server(&server);
    let err = client
        .payments()
        .request_payment(
            PaymentRequest {
                currency: Currency::EUR,
                ..Default::default()
            },
            None,
        )
        .await
        .expect_err("sourceless payment must fail validation");
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn malformed_success_body_surfaces_deserialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payments/pay_bad"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("not json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server);
    let err = client
        .payments()
        .get_payment_details("pay_bad")
        .await
        .expect_err("bad body should fail decoding");
    assert!(matches!(err, Error::Serialization(_)));
}

#[tokio::test]
async fn bodyless_requests_still_send_json_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payments/pay_123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "pay_123" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server);
    client
        .payments()
        .get_payment_details("pay_123")
        .await
        .expect("request should succeed");
}

#[tokio::test]
async fn bare_array_responses_decode_via_items_wrapper() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payments/pay_123/actions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Cko-Request-Id", "req_actions")
                .set_body_json(json!([
                    { "id": "act_1", "type": "Authorization", "approved": true },
                    { "id": "act_2", "type": "Capture", "approved": true }
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server);
    let actions = client
        .payments()
        .get_payment_actions("pay_123")
        .await
        .expect("actions should decode");
    assert_eq!(actions.items.len(), 2);
    assert_eq!(actions.items[1].action_type.as_deref(), Some("Capture"));
    // Bare-array endpoints still carry the HTTP envelope.
    assert_eq!(actions.http_metadata.status_code, 200);
    assert_eq!(
        actions.http_metadata.request_id.as_deref(),
        Some("req_actions")
    );
}
