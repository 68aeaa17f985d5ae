//! Login flows through `FrappeApp::auth`.

use super::common::mock_site;
use frappe_sdk::auth::AuthCredentials;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_two_factor_login() {
    let (server, app) = mock_site().await;

    Mock::given(method("POST"))
        .and(path("/api/method/login"))
        .and(body_json(json!({"usr": "jane@example.com", "pwd": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verification": {"token_delivery": true, "method": "Email"},
            "tmp_id": "8f2a"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/method/login"))
        .and(body_json(json!({"otp": "123456", "tmp_id": "8f2a", "device": "mobile"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Logged In",
            "home_page": "/app",
            "full_name": "Jane Doe"
        })))
        .mount(&server)
        .await;

    let auth = app.auth();
    let first = auth
        .login_with_username_password(&AuthCredentials::password("jane@example.com", "s3cret"))
        .await
        .unwrap();
    assert!(first.requires_otp());
    let tmp_id = first.tmp_id.clone().unwrap();

    let second = auth
        .login_with_username_password(
            &AuthCredentials::otp("123456", tmp_id).with_device("mobile"),
        )
        .await
        .unwrap();
    assert!(!second.requires_otp());
    assert_eq!(second.full_name.as_deref(), Some("Jane Doe"));
}

#[tokio::test]
async fn test_logged_in_user_and_logout() {
    let (server, app) = mock_site().await;

    Mock::given(method("GET"))
        .and(path("/api/method/frappe.auth.get_logged_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Guest"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/method/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(app.auth().get_logged_in_user().await.unwrap(), "Guest");
    app.auth().logout().await.unwrap();
}
