//! Document round trips through `FrappeApp::db`.

use super::common::mock_site;
use frappe_sdk::db::{Document, Filter, FrappeDoc, GetDocListArgs, OrderBy};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Note {
    title: String,
    #[serde(default)]
    public: u8,
}

fn saved_note() -> serde_json::Value {
    json!({
        "name": "N-0001",
        "owner": "Administrator",
        "creation": "2024-05-01 09:00:00.000000",
        "modified": "2024-05-01 09:00:00.000000",
        "docstatus": 0,
        "idx": 0,
        "title": "x",
        "public": 0
    })
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (server, app) = mock_site().await;

    Mock::given(method("POST"))
        .and(path("/api/resource/Note"))
        .and(body_json(json!({"title": "x", "public": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": saved_note()})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Note/N-0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": saved_note()})))
        .expect(1)
        .mount(&server)
        .await;

    let input = Note {
        title: "x".to_string(),
        public: 0,
    };
    let created: FrappeDoc<Note> = app.db().create_doc("Note", &input).await.unwrap();
    assert_eq!(created.doc, input);
    assert_eq!(created.name, "N-0001");
    assert_eq!(created.owner.as_deref(), Some("Administrator"));

    let fetched: FrappeDoc<Note> = app.db().get_doc("Note", &created.name).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.creation_time(), created.creation_time());
}

#[tokio::test]
async fn test_latest_from_list_matches_last_doc() {
    let (server, app) = mock_site().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Note"))
        .and(query_param("order_by", "creation desc"))
        .and(query_param("limit", "1"))
        .and(query_param("fields", r#"["name"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"name": "N-0001"}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Note"))
        .and(query_param("order_by", "creation desc"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [saved_note()]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Note/N-0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": saved_note()})))
        .mount(&server)
        .await;

    let db = app.db();
    let listed: Vec<Document> = db
        .get_doc_list(
            "Note",
            Some(&GetDocListArgs::new().limit(1).order_by(OrderBy::desc("creation"))),
        )
        .await
        .unwrap();
    let last: Document = db.get_last_doc("Note", None).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], last);
}

#[tokio::test]
async fn test_filters_travel_as_json_text() {
    let (server, app) = mock_site().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Note"))
        .and(query_param("filters", r#"[["status","=","Open"]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"name": "N-0002"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docs: Vec<Document> = app
        .db()
        .get_doc_list(
            "Note",
            Some(&GetDocListArgs::new().filter(Filter::eq("status", "Open"))),
        )
        .await
        .unwrap();
    assert_eq!(docs[0]["name"], "N-0002");
}

#[tokio::test]
async fn test_delete_doc() {
    let (server, app) = mock_site().await;

    Mock::given(method("DELETE"))
        .and(path("/api/resource/Note/N-1"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = app.db().delete_doc("Note", Some("N-1")).await.unwrap();
    assert_eq!(response.message, "ok");
}

#[tokio::test]
async fn test_delete_doc_without_message() {
    let (server, app) = mock_site().await;

    Mock::given(method("DELETE"))
        .and(path("/api/resource/Note/N-1"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let err = app.db().delete_doc("Note", Some("N-1")).await.unwrap_err();
    assert_eq!(err.exception, "");
    assert_eq!(err.message, "There was an error while deleting the document.");
}

#[tokio::test]
async fn test_count_and_update() {
    let (server, app) = mock_site().await;

    Mock::given(method("GET"))
        .and(path("/api/method/frappe.client.get_count"))
        .and(query_param("doctype", "Note"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": 3})))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/resource/Note/N%200001"))
        .and(body_json(json!({"public": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"name": "N 0001", "title": "x", "public": 1}
        })))
        .mount(&server)
        .await;

    let db = app.db();
    assert_eq!(db.get_count("Note", None, false, false).await.unwrap(), 3);

    let updated: FrappeDoc<Note> = db
        .update_doc("Note", "N 0001", &json!({"public": 1}))
        .await
        .unwrap();
    assert_eq!(updated.doc.public, 1);
}
