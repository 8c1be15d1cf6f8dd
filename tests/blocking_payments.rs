#![cfg(feature = "blocking")]

//! Blocking client tests. The mock server needs an async runtime, so setup
//! runs inside `block_on` while the client calls stay on the test thread.

use std::sync::Arc;

use checkout_sdk::{
    BlockingApiClient, BlockingConfig, CaptureRequest, CredentialsProvider, Currency, Error,
    PaymentRequest, PaymentSource, RequestOptions, StaticKeysCredentials,
};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET_KEY: &str = "sk_sbox_m73dzbpy7cf3gfd46xr4yj5xo4e";

fn blocking_client(server: &MockServer) -> BlockingApiClient {
    let credentials: Arc<dyn CredentialsProvider> = Arc::new(
        StaticKeysCredentials::new(SECRET_KEY).expect("credentials should be valid"),
    );
    BlockingApiClient::new(BlockingConfig {
        credentials: Some(credentials),
        base_url: Some(server.uri()),
        ..Default::default()
    })
    .expect("client creation should succeed")
}

#[test]
fn blocking_payment_round_trip() {
    let rt = Runtime::new().expect("runtime should start");
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments"))
            .and(body_json(json!({
                "source": {"type": "token", "token": "tok_4gzeau5o2uqubbk6fufs3m7p54"},
                "amount": 6500,
                "currency": "GBP"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "pay_mbabizu24mvu3mela5njyhpit4",
                "status": "Authorized",
                "amount": 6500,
                "currency": "GBP"
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let client = blocking_client(&server);
    let payment = client
        .payments()
        .request_payment(
            PaymentRequest {
                source: Some(PaymentSource::Token {
                    token: "tok_4gzeau5o2uqubbk6fufs3m7p54".into(),
                }),
                amount: Some(6500),
                currency: Currency::GBP,
                ..Default::default()
            },
            None,
        )
        .expect("payment should succeed");

    assert_eq!(payment.id, "pay_mbabizu24mvu3mela5njyhpit4");
    assert_eq!(payment.http_metadata.status_code, 201);
}

#[test]
fn blocking_capture_sends_idempotency_key() {
    let rt = Runtime::new().expect("runtime should start");
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/pay_1/captures"))
            .and(header("Cko-Idempotency-Key", "order-42"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "action_id": "act_1",
                "reference": "order-42"
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let client = blocking_client(&server);
    let capture = client
        .payments()
        .capture_payment(
            "pay_1",
            CaptureRequest::default(),
            Some(RequestOptions::default().with_idempotency_key("order-42")),
        )
        .expect("capture should succeed");

    assert_eq!(capture.action_id, "act_1");
}

#[test]
fn blocking_capture_with_empty_payment_id_fails_before_network() {
    let rt = Runtime::new().expect("runtime should start");
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        server
    });

    let client = blocking_client(&server);
    let err = client
        .payments()
        .capture_payment("  ", CaptureRequest::default(), None)
        .expect_err("blank payment id should fail validation");
    assert!(matches!(err, Error::Validation(_)));

    let received = rt.block_on(server.received_requests()).unwrap();
    assert!(received.is_empty());
}

#[test]
fn blocking_error_statuses_map_to_api_errors() {
    let rt = Runtime::new().expect("runtime should start");
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payments/pay_missing"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let client = blocking_client(&server);
    let err = client
        .payments()
        .get_payment_details("pay_missing")
        .expect_err("missing payment should fail");
    match err {
        Error::Api(api) => assert_eq!(api.status_code, 404),
        other => panic!("expected api error, got {other:?}"),
    }
}
