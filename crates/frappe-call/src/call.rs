//! Whitelisted method client.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::instrument;

use frappe_sdk_client::{
    normalize, AppConfig, ClientConfig, FrappeClient, Result, TransportFailure,
};

use crate::METHOD_PATH;

/// Client for `/api/method/{path}` endpoints.
///
/// Results are the whole decoded response body. Most methods wrap their
/// return value as `{"message": ...}`; decode into
/// [`MethodResponse<T>`](crate::MethodResponse) to unwrap it.
///
/// Failures carry the server's message, or the generic default when the
/// server sent none.
#[derive(Debug, Clone)]
pub struct FrappeCall {
    client: FrappeClient,
}

impl FrappeCall {
    /// Create a method client for the site at `url`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = FrappeClient::new(AppConfig::new(url))?;
        Ok(Self { client })
    }

    /// Create a method client with explicit configuration.
    pub fn with_config(config: AppConfig, client_config: ClientConfig) -> Result<Self> {
        let client = FrappeClient::with_config(config, client_config)?;
        Ok(Self { client })
    }

    /// Create a method client from an existing FrappeClient.
    pub fn from_client(client: FrappeClient) -> Self {
        Self { client }
    }

    /// Get the underlying FrappeClient.
    pub fn inner(&self) -> &FrappeClient {
        &self.client
    }

    /// Call a method with GET; `params` must be a JSON object and travels
    /// in the query string.
    ///
    /// Null values are dropped, strings are sent verbatim and every other
    /// value as its JSON text.
    #[instrument(skip(self, params))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: Option<&Value>) -> Result<T> {
        let query = match params {
            Some(params) => query_pairs(params).map_err(|failure| normalize(failure, None))?,
            None => Vec::new(),
        };
        self.client.get_json(&method_path(path), query, None).await
    }

    /// Call a method with POST; `params` (or `{}`) is the JSON body.
    #[instrument(skip(self, params))]
    pub async fn post<T: DeserializeOwned>(&self, path: &str, params: Option<&Value>) -> Result<T> {
        self.client
            .post_json(&method_path(path), &json_body(params), None)
            .await
    }

    /// Call a method with PUT; `params` (or `{}`) is the JSON body.
    #[instrument(skip(self, params))]
    pub async fn put<T: DeserializeOwned>(&self, path: &str, params: Option<&Value>) -> Result<T> {
        self.client
            .put_json(&method_path(path), &json_body(params), None)
            .await
    }

    /// Call a method with DELETE; `params` (or `{}`) is the JSON body.
    #[instrument(skip(self, params))]
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Value>,
    ) -> Result<T> {
        self.client
            .delete_json(&method_path(path), Some(json_body(params)), None)
            .await
    }
}

fn method_path(path: &str) -> String {
    format!("{}/{}", METHOD_PATH, path.trim_start_matches('/'))
}

fn json_body(params: Option<&Value>) -> Value {
    params
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn query_pairs(params: &Value) -> std::result::Result<Vec<(String, String)>, TransportFailure> {
    let Value::Object(map) = params else {
        return Err(TransportFailure::Request(
            "GET parameters must be a JSON object".to_string(),
        ));
    };

    Ok(map
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MethodResponse;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn call(server: &MockServer) -> FrappeCall {
        FrappeCall::new(server.uri()).unwrap()
    }

    #[test]
    fn test_query_pairs() {
        let params = serde_json::json!({
            "doctype": "Note",
            "limit": 5,
            "as_dict": true,
            "skip": null,
            "filters": {"public": 1},
            "fields": ["name", "title"]
        });

        let pairs = query_pairs(&params).unwrap();
        let get = |k: &str| pairs.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());

        assert_eq!(get("doctype"), Some("Note"));
        assert_eq!(get("limit"), Some("5"));
        assert_eq!(get("as_dict"), Some("true"));
        assert_eq!(get("skip"), None);
        assert_eq!(get("filters"), Some(r#"{"public":1}"#));
        assert_eq!(get("fields"), Some(r#"["name","title"]"#));
    }

    #[test]
    fn test_non_object_params_rejected() {
        assert!(matches!(
            query_pairs(&serde_json::json!(["a"])),
            Err(TransportFailure::Request(_))
        ));
    }

    #[test]
    fn test_method_path() {
        assert_eq!(method_path("frappe.ping"), "/api/method/frappe.ping");
        assert_eq!(method_path("/frappe.ping"), "/api/method/frappe.ping");
    }

    #[tokio::test]
    async fn test_get_with_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/method/frappe.client.get_value"))
            .and(query_param("doctype", "User"))
            .and(query_param("filters", r#"{"name":"Administrator"}"#))
            .and(query_param_is_missing("as_dict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"full_name": "Administrator"}
            })))
            .mount(&mock_server)
            .await;

        let response: MethodResponse<Value> = call(&mock_server)
            .get(
                "frappe.client.get_value",
                Some(&serde_json::json!({
                    "doctype": "User",
                    "filters": {"name": "Administrator"},
                    "as_dict": null
                })),
            )
            .await
            .unwrap();

        assert_eq!(response.message["full_name"], "Administrator");
    }

    #[tokio::test]
    async fn test_get_returns_whole_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/method/frappe.ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "pong"
            })))
            .mount(&mock_server)
            .await;

        let body: Value = call(&mock_server).get("frappe.ping", None).await.unwrap();
        assert_eq!(body, serde_json::json!({"message": "pong"}));
    }

    #[tokio::test]
    async fn test_post_sends_params_as_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/method/frappe.client.set_value"))
            .and(body_json(serde_json::json!({
                "doctype": "Note",
                "name": "N-1",
                "fieldname": "title",
                "value": "z"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"name": "N-1", "title": "z"}
            })))
            .mount(&mock_server)
            .await;

        let response: MethodResponse<Value> = call(&mock_server)
            .post(
                "frappe.client.set_value",
                Some(&serde_json::json!({
                    "doctype": "Note",
                    "name": "N-1",
                    "fieldname": "title",
                    "value": "z"
                })),
            )
            .await
            .unwrap();
        assert_eq!(response.message["title"], "z");
    }

    #[tokio::test]
    async fn test_put_and_delete_default_to_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/method/app.api.touch"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": 1})))
            .mount(&mock_server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/method/app.api.purge"))
            .and(body_json(serde_json::json!({"older_than": 30})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "done"})))
            .mount(&mock_server)
            .await;

        let client = call(&mock_server);
        let touched: MethodResponse<u32> = client.put("app.api.touch", None).await.unwrap();
        assert_eq!(touched.message, 1);

        let purged: MethodResponse<String> = client
            .delete("app.api.purge", Some(&serde_json::json!({"older_than": 30})))
            .await
            .unwrap();
        assert_eq!(purged.message, "done");
    }

    #[tokio::test]
    async fn test_error_without_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/method/app.api.fail"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "exc_type": "ZeroDivisionError",
                "exc": "[\"Traceback ...\"]"
            })))
            .mount(&mock_server)
            .await;

        let err = call(&mock_server)
            .post::<Value>("app.api.fail", None)
            .await
            .unwrap_err();

        assert_eq!(err.message, "There was an error.");
        assert_eq!(err.exception, "");
        assert_eq!(err.http_status, Some(500));
        assert_eq!(err.exc_type.as_deref(), Some("ZeroDivisionError"));
        assert!(err.exc.is_some());
    }

    #[tokio::test]
    async fn test_permission_error_message_passes_through() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/method/app.api.secret"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "exception": "frappe.exceptions.PermissionError",
                "message": "Not permitted"
            })))
            .mount(&mock_server)
            .await;

        let err = call(&mock_server)
            .get::<Value>("app.api.secret", None)
            .await
            .unwrap_err();

        assert_eq!(err.message, "Not permitted");
        assert!(err.is_auth_error());
        assert!(err.is_exception("PermissionError"));
    }
}
