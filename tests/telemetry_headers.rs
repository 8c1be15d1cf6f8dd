//! Telemetry header chaining across consecutive requests.

use std::sync::Arc;

use checkout_sdk::{ApiClient, Config, CredentialsProvider, StaticKeysCredentials};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET_KEY: &str = "sk_sbox_m73dzbpy7cf3gfd46xr4yj5xo4e";

fn client_for_server(server: &MockServer, enable_telemetry: Option<bool>) -> ApiClient {
    let credentials: Arc<dyn CredentialsProvider> = Arc::new(
        StaticKeysCredentials::new(SECRET_KEY).expect("credentials should be valid"),
    );
    ApiClient::new(Config {
        credentials: Some(credentials),
        base_url: Some(server.uri()),
        enable_telemetry,
        ..Default::default()
    })
    .expect("client creation should succeed")
}

async fn mount_payment(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/payments/pay_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "pay_1" })))
        .mount(server)
        .await;
}

fn telemetry_header(request: &wiremock::Request) -> Option<serde_json::Value> {
    request
        .headers
        .get("cko-sdk-telemetry")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| serde_json::from_str(v).ok())
}

#[tokio::test]
async fn first_call_carries_no_telemetry_header_and_chain_links_follow() {
    let server = MockServer::start().await;
    mount_payment(&server).await;

    let client = client_for_server(&server, None);
    for _ in 0..3 {
        client
            .payments()
            .get_payment_details("pay_1")
            .await
            .expect("request should succeed");
    }

    let requests = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    assert_eq!(requests.len(), 3);

    // Fresh client, empty queue: no telemetry on the first request.
    assert!(telemetry_header(&requests[0]).is_none());

    let second = telemetry_header(&requests[1]).expect("second request should carry telemetry");
    let third = telemetry_header(&requests[2]).expect("third request should carry telemetry");

    // Each header reports the previous request, labeled with the current id.
    assert_ne!(second["prev_request_id"], second["request_id"]);
    assert_eq!(third["prev_request_id"], second["request_id"]);
    assert_ne!(third["request_id"], second["request_id"]);
    assert!(second["prev_request_duration"].as_u64().is_some());
}

#[tokio::test]
async fn telemetry_can_be_disabled() {
    let server = MockServer::start().await;
    mount_payment(&server).await;

    let client = client_for_server(&server, Some(false));
    for _ in 0..2 {
        client
            .payments()
            .get_payment_details("pay_1")
            .await
            .expect("request should succeed");
    }

    let requests = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    assert!(requests.iter().all(|req| telemetry_header(req).is_none()));
}
