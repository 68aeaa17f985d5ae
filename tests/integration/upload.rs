//! File uploads through `FrappeApp::file`.

use std::sync::{Arc, Mutex};

use super::common::mock_site;
use frappe_sdk::file::{FileArgs, UploadFile, UPLOAD_CHUNK_SIZE};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_upload_from_path_with_progress() {
    let (server, app) = mock_site().await;

    Mock::given(method("POST"))
        .and(path("/api/method/upload_file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"ignored": true},
            "data": {"name": "f1", "file_url": "/private/files/scan.png", "is_private": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("scan.png");
    std::fs::write(&file_path, vec![7u8; UPLOAD_CHUNK_SIZE + 1]).unwrap();

    let file = UploadFile::from_path(&file_path).await.unwrap();
    assert_eq!(file.content_type.as_deref(), Some("image/png"));

    let progress: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = progress.clone();

    let saved: serde_json::Value = app
        .file()
        .upload_file(
            file,
            &FileArgs::new().private(true).attach_to("ToDo", "TD-1"),
            Some(Arc::new(move |sent, _total| sink.lock().unwrap().push(sent))),
            None,
        )
        .await
        .unwrap();

    assert_eq!(saved["file_url"], "/private/files/scan.png");

    let progress = progress.lock().unwrap();
    assert_eq!(*progress, vec![UPLOAD_CHUNK_SIZE as u64, UPLOAD_CHUNK_SIZE as u64 + 1]);

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"filename="scan.png""#));
    assert!(body.contains("Content-Type: image/png"));
    assert!(body.contains(r#"name="docname""#));
}
