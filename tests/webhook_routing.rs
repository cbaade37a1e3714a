//! End-to-end routing tests against mocked HubSpot and Aircall APIs.
//!
//! Each test points the real HTTP clients at a wiremock server and either
//! drives `CallRouter` directly or posts a webhook to a live Axum server.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use call_relay::config::{AircallConfig, HubspotConfig, RelayConfig};
use call_relay::routing::CallRouter;
use call_relay::routing::types::{AbortReason, RoutingOutcome, WebhookEvent, WebhookPayload};
use call_relay::server::{build_call_router, relay_routes};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn config_for(server: &MockServer) -> RelayConfig {
    RelayConfig {
        host: "127.0.0.1".into(),
        port: 0,
        hubspot: HubspotConfig {
            base_url: server.uri(),
            api_key: SecretString::from("hs-key".to_string()),
        },
        aircall: AircallConfig {
            base_url: server.uri(),
            api_id: "id".into(),
            api_token: SecretString::from("token".to_string()),
        },
        http_timeout: Some(Duration::from_secs(2)),
    }
}

fn ana_webhook() -> Value {
    json!({
        "event": "call.created",
        "data": {"direction": "inbound", "raw_digits": "+1 415 555 0100", "id": "call_1"}
    })
}

fn event_from(body: Value) -> WebhookEvent {
    let payload: WebhookPayload = serde_json::from_value(body).unwrap();
    WebhookEvent::from(payload)
}

/// Mount the HubSpot side of the Ana scenario.
async fn mount_crm(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/crm/v3/objects/contacts/search"))
        .and(body_json(json!({
            "filterGroups": [{"filters": [{"value": "+14155550100", "propertyName": "phone", "operator": "EQ"}]}],
            "properties": ["firstname", "hubspot_owner_id"],
            "limit": 1,
            "after": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "results": [{"id": "7", "properties": {"firstname": "Ana", "hubspot_owner_id": "42"}}]
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/crm/v3/owners/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42",
            "email": "ana@co.com"
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_directory(server: &MockServer, users: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": users,
            "meta": {"next_page_link": null}
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_transfer(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/calls/call_1/transfers"))
        .and(body_json(json!({"user_id": "u9"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(expected)
        .mount(server)
        .await;
}

fn router_for(server: &MockServer) -> CallRouter {
    build_call_router(&config_for(server)).unwrap()
}

#[tokio::test]
async fn available_owner_receives_the_call() {
    timeout(TEST_TIMEOUT, async {
        let server = MockServer::start().await;
        mount_crm(&server).await;
        mount_directory(
            &server,
            json!([
                {"id": "u1", "email": "bo@co.com", "available": true, "availability_status": "available"},
                {"id": "u9", "email": "ana@co.com", "available": true, "availability_status": "available"}
            ]),
        )
        .await;
        mount_transfer(&server, 1).await;

        let outcome = router_for(&server).route(event_from(ana_webhook())).await;

        assert_eq!(
            outcome,
            RoutingOutcome::Forwarded {
                call_id: "call_1".into(),
                agent_id: "u9".into(),
            }
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn no_directory_match_means_no_transfer() {
    timeout(TEST_TIMEOUT, async {
        let server = MockServer::start().await;
        mount_crm(&server).await;
        mount_directory(
            &server,
            json!([{"id": "u1", "email": "bo@co.com", "available": true, "availability_status": "available"}]),
        )
        .await;
        mount_transfer(&server, 0).await;

        let outcome = router_for(&server).route(event_from(ana_webhook())).await;

        assert_eq!(outcome, RoutingOutcome::Aborted(AbortReason::AgentNotFound));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn busy_agent_means_no_transfer() {
    timeout(TEST_TIMEOUT, async {
        let server = MockServer::start().await;
        mount_crm(&server).await;
        mount_directory(
            &server,
            json!([{"id": "u9", "email": "ana@co.com", "available": true, "availability_status": "in_call"}]),
        )
        .await;
        mount_transfer(&server, 0).await;

        let outcome = router_for(&server).route(event_from(ana_webhook())).await;

        assert_eq!(outcome, RoutingOutcome::Aborted(AbortReason::AgentUnavailable));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn crm_outage_aborts_quietly() {
    timeout(TEST_TIMEOUT, async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/contacts/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/users"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = router_for(&server).route(event_from(ana_webhook())).await;

        match outcome {
            RoutingOutcome::Aborted(AbortReason::ContactLookupFailed(reason)) => {
                assert!(reason.contains("500"));
            }
            other => panic!("expected ContactLookupFailed, got {other:?}"),
        }
    })
    .await
    .expect("test timed out");
}

// ── Live server ─────────────────────────────────────────────────────────

/// Start the relay on a random port, return its base URL.
async fn start_relay(router: CallRouter) -> String {
    let app = relay_routes(Arc::new(router));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

/// Wait until the mock server has seen a request to `wanted_path`.
async fn wait_for_request(server: &MockServer, wanted_path: &str) {
    loop {
        let seen = server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .any(|req| req.url.path() == wanted_path);
        if seen {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn webhook_post_is_acknowledged_and_forwarded() {
    timeout(TEST_TIMEOUT, async {
        let server = MockServer::start().await;
        mount_crm(&server).await;
        mount_directory(
            &server,
            json!([{"id": "u9", "email": "ana@co.com", "available": true, "availability_status": "available"}]),
        )
        .await;
        mount_transfer(&server, 1).await;

        let base = start_relay(router_for(&server)).await;
        let resp = reqwest::Client::new()
            .post(format!("{base}/aircall/calls"))
            .json(&ana_webhook())
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        wait_for_request(&server, "/v1/calls/call_1/transfers").await;
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn ignored_webhooks_make_no_outbound_calls() {
    timeout(TEST_TIMEOUT, async {
        let server = MockServer::start().await;
        let base = start_relay(router_for(&server)).await;
        let client = reqwest::Client::new();

        for body in [
            json!({"event": "call.created", "data": {"direction": "outbound", "raw_digits": "+1", "id": 5}}),
            json!({"event": "call.hungup", "data": {"direction": "inbound", "raw_digits": "+1", "id": 5}}),
        ] {
            let resp = client
                .post(format!("{base}/aircall/calls"))
                .json(&body)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 200);
        }

        let health: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
        assert_eq!(health["message"], "Server is running");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    })
    .await
    .expect("test timed out");
}
