//! Failure normalization across groups.

use super::common::{init_tracing, mock_site};
use frappe_sdk::db::Document;
use frappe_sdk::{ClientConfig, FrappeApp};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_validation_error_417() {
    let (server, app) = mock_site().await;

    Mock::given(method("POST"))
        .and(path("/api/resource/Note"))
        .respond_with(ResponseTemplate::new(417).set_body_json(json!({
            "exception": "ValidationError",
            "message": "Bad input",
            "_server_messages": "[\"{\\\"message\\\": \\\"Bad input\\\"}\"]"
        })))
        .mount(&server)
        .await;

    let err = app
        .db()
        .create_doc::<Document, _>("Note", &json!({"title": ""}))
        .await
        .unwrap_err();

    assert_eq!(err.exception, "ValidationError");
    assert_eq!(err.message, "Bad input");
    assert_eq!(err.http_status, Some(417));
    assert_eq!(err.http_status_text.as_deref(), Some("Expectation Failed"));
    assert!(err.server_messages.as_deref().unwrap().contains("Bad input"));
    assert_eq!(err.to_string(), "Bad input");
}

#[tokio::test]
async fn test_html_error_page_uses_fallback() {
    let (server, app) = mock_site().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Note/N-1"))
        .respond_with(
            ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let err = app
        .db()
        .get_doc::<Document>("Note", "N-1")
        .await
        .unwrap_err();

    assert_eq!(err.message, "There was an error while fetching the document.");
    assert_eq!(err.exception, "");
    assert_eq!(err.http_status, Some(502));
    assert!(err.exc.is_none());
}

#[tokio::test]
async fn test_call_group_has_no_fallback() {
    let (server, app) = mock_site().await;

    Mock::given(method("GET"))
        .and(path("/api/method/app.api.missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = app
        .call()
        .get::<serde_json::Value>("app.api.missing", None)
        .await
        .unwrap_err();

    assert_eq!(err.message, "There was an error.");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_network_failure_has_no_status() {
    init_tracing();
    let app = FrappeApp::with_config(
        frappe_sdk::AppConfig::new("http://127.0.0.1:1"),
        ClientConfig::builder()
            .with_connect_timeout(Duration::from_secs(2))
            .build(),
    )
    .unwrap();

    let err = app.auth().get_logged_in_user().await.unwrap_err();

    assert!(err.is_network_error());
    assert!(!err.is_local_error());
    assert!(err.http_status.is_none());
    assert_eq!(
        err.message,
        "There was an error while fetching the logged in user"
    );
    assert!(std::error::Error::source(&err).is_some());
}
