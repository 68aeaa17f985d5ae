//! Method calls through `FrappeApp::call`.

use super::common::mock_site;
use frappe_sdk::call::MethodResponse;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Version {
    frappe: String,
}

#[tokio::test]
async fn test_get_typed_message() {
    let (server, app) = mock_site().await;

    Mock::given(method("GET"))
        .and(path("/api/method/frappe.utils.change_log.get_versions"))
        .and(query_param("verbose", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"frappe": "15.20.0"}
        })))
        .mount(&server)
        .await;

    let response: MethodResponse<Version> = app
        .call()
        .get(
            "frappe.utils.change_log.get_versions",
            Some(&json!({"verbose": false})),
        )
        .await
        .unwrap();
    assert_eq!(response.message.frappe, "15.20.0");
}

#[tokio::test]
async fn test_post_and_delete() {
    let (server, app) = mock_site().await;

    Mock::given(method("POST"))
        .and(path("/api/method/frappe.client.insert"))
        .and(body_json(json!({"doc": {"doctype": "ToDo", "description": "x"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"name": "TD-1", "doctype": "ToDo"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/method/frappe.client.delete"))
        .and(body_json(json!({"doctype": "ToDo", "name": "TD-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let call = app.call();
    let inserted: MethodResponse<serde_json::Value> = call
        .post(
            "frappe.client.insert",
            Some(&json!({"doc": {"doctype": "ToDo", "description": "x"}})),
        )
        .await
        .unwrap();
    assert_eq!(inserted.message["name"], "TD-1");

    let deleted: serde_json::Value = call
        .delete(
            "frappe.client.delete",
            Some(&json!({"doctype": "ToDo", "name": "TD-1"})),
        )
        .await
        .unwrap();
    assert_eq!(deleted, json!({}));
}
