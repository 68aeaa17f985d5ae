//! Header composition as seen by the server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::common::init_tracing;
use frappe_sdk::{AppConfig, AuthMode, ClientConfig, FrappeApp, StaticAmbient, TokenProvider};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn ping_server() -> MockServer {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/method/frappe.ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "pong"})))
        .mount(&server)
        .await;
    server
}

async fn last_request(server: &MockServer) -> wiremock::Request {
    let requests = server.received_requests().await.unwrap();
    requests.last().unwrap().clone()
}

#[tokio::test]
async fn test_same_origin_page_sends_site_name_and_csrf() {
    let server = ping_server().await;

    let app = FrappeApp::new(server.uri()).unwrap().with_ambient(Arc::new(
        StaticAmbient::new()
            .with_page_url(&format!("{}/app/note", server.uri()))
            .with_csrf_token("f00dcafe"),
    ));

    let _: serde_json::Value = app.call().get("frappe.ping", None).await.unwrap();

    let headers = last_request(&server).await.headers;
    assert_eq!(headers.get("X-Frappe-Site-Name").unwrap(), "127.0.0.1");
    assert_eq!(headers.get("X-Frappe-CSRF-Token").unwrap(), "f00dcafe");
}

#[tokio::test]
async fn test_cross_origin_page_omits_site_name() {
    let server = ping_server().await;

    let app = FrappeApp::new(server.uri()).unwrap().with_ambient(Arc::new(
        StaticAmbient::new()
            .with_page_url("https://portal.example.com/app")
            .with_csrf_token("f00dcafe"),
    ));

    let _: serde_json::Value = app.call().get("frappe.ping", None).await.unwrap();

    let headers = last_request(&server).await.headers;
    assert!(headers.get("X-Frappe-Site-Name").is_none());
    assert_eq!(headers.get("X-Frappe-CSRF-Token").unwrap(), "f00dcafe");
}

#[tokio::test]
async fn test_csrf_placeholder_not_sent() {
    let server = ping_server().await;

    let app = FrappeApp::new(server.uri()).unwrap().with_ambient(Arc::new(
        StaticAmbient::new().with_csrf_token("{{ csrf_token }}"),
    ));

    let _: serde_json::Value = app.call().get("frappe.ping", None).await.unwrap();

    let headers = last_request(&server).await.headers;
    assert!(headers.get("X-Frappe-CSRF-Token").is_none());
}

#[tokio::test]
async fn test_token_provider_called_per_request() {
    let server = ping_server().await;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let provider = TokenProvider::new(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("token-{}", n)
    });

    let app = FrappeApp::with_config(
        AppConfig::new(server.uri()).with_token(AuthMode::Bearer, provider),
        ClientConfig::default(),
    )
    .unwrap();

    let call = app.call();
    let _: serde_json::Value = call.get("frappe.ping", None).await.unwrap();
    let _: serde_json::Value = call.get("frappe.ping", None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let auth: Vec<&str> = requests
        .iter()
        .map(|r| r.headers.get("Authorization").unwrap().to_str().unwrap())
        .collect();
    assert_eq!(auth, vec!["Bearer token-1", "Bearer token-2"]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_api_key_token_and_custom_headers() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Note/N-1"))
        .and(header("Authorization", "token key:secret"))
        .and(header("Accept", "text/plain"))
        .and(header("X-Request-Source", "tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"name": "N-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let app = FrappeApp::with_config(
        AppConfig::new(server.uri())
            .with_token(AuthMode::Token, TokenProvider::api_key("key", "secret"))
            .with_header("Accept", "text/plain")
            .with_header("X-Request-Source", "tests"),
        ClientConfig::default(),
    )
    .unwrap();

    let doc: frappe_sdk::db::Document = app.db().get_doc("Note", "N-1").await.unwrap();
    assert_eq!(doc["name"], "N-1");
}
