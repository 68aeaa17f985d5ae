//! High-level client with typed JSON methods.
//!
//! `FrappeClient` combines an [`AppConfig`] snapshot, the ambient context and
//! the shared transport. Capability crates (auth, db, call, file) hold one
//! and go through its methods, which is where every transport failure is
//! normalized into a [`FrappeError`].
//!
//! ## Security
//!
//! - Tokens are never recorded in tracing spans
//! - `Debug` output of the configuration redacts the token provider

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::ambient::{AmbientContext, NoAmbient};
use crate::client::FrappeHttpClient;
use crate::config::{AppConfig, ClientConfig};
use crate::error::{normalize, Result, TransportFailure};
use crate::headers::{build_headers, RequestHeaders};
use crate::request::{RequestBody, RequestBuilder, RequestMethod};
use crate::response::Response;

/// High-level client bound to one site.
///
/// # Example
///
/// ```rust,ignore
/// use frappe_sdk_client::{AppConfig, FrappeClient};
///
/// let client = FrappeClient::new(AppConfig::new("https://erp.example.com"))?;
///
/// let user: serde_json::Value = client
///     .get_json("/api/method/frappe.auth.get_logged_user", Vec::new(), None)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct FrappeClient {
    http: FrappeHttpClient,
    config: AppConfig,
    ambient: Arc<dyn AmbientContext>,
}

impl FrappeClient {
    /// Create a client with the default transport configuration.
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_config(config, ClientConfig::default())
    }

    /// Create a client with a custom transport configuration.
    pub fn with_config(config: AppConfig, client_config: ClientConfig) -> Result<Self> {
        let http = FrappeHttpClient::new(client_config)?;
        Self::from_parts(http, config)
    }

    /// Create a client on top of an existing transport.
    pub fn from_parts(http: FrappeHttpClient, config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http,
            config,
            ambient: Arc::new(NoAmbient),
        })
    }

    /// Use the given ambient context when composing headers.
    pub fn with_ambient(mut self, ambient: Arc<dyn AmbientContext>) -> Self {
        self.ambient = ambient;
        self
    }

    /// The configuration snapshot.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The ambient context.
    pub fn ambient(&self) -> &dyn AmbientContext {
        self.ambient.as_ref()
    }

    /// The underlying transport.
    pub fn http(&self) -> &FrappeHttpClient {
        &self.http
    }

    /// The site base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Headers for a new request, computed fresh.
    pub fn headers(&self) -> RequestHeaders {
        build_headers(&self.config, self.ambient.as_ref())
    }

    /// Build the full URL for a path.
    ///
    /// Full URLs are used as-is. Otherwise the path is joined to the base URL,
    /// or to the page origin when the base URL is empty.
    pub fn url(&self, path: &str) -> std::result::Result<String, TransportFailure> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.to_string());
        }

        let base = if self.config.base_url().is_empty() {
            self.ambient
                .location()
                .map(|loc| loc.origin)
                .ok_or_else(|| {
                    TransportFailure::Request(
                        "No base URL configured and no page origin available".to_string(),
                    )
                })?
        } else {
            self.config.base_url().to_string()
        };

        if path.starts_with('/') {
            Ok(format!("{}{}", base, path))
        } else {
            Ok(format!("{}/{}", base, path))
        }
    }

    /// Build a request carrying freshly composed headers.
    pub fn request(
        &self,
        method: RequestMethod,
        path: &str,
    ) -> std::result::Result<RequestBuilder, TransportFailure> {
        Ok(RequestBuilder::new(method, self.url(path)?).headers(self.headers()))
    }

    // =========================================================================
    // Typed request methods
    // =========================================================================

    /// GET request with query parameters and JSON response.
    #[instrument(skip(self, query, fallback))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        fallback: Option<&str>,
    ) -> Result<T> {
        self.exchange(RequestMethod::Get, path, query, None, fallback)
            .await
    }

    /// POST request with JSON body and response.
    #[instrument(skip(self, body, fallback))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: Option<&str>,
    ) -> Result<T> {
        let body = to_json_body(body);
        self.exchange(RequestMethod::Post, path, Vec::new(), Some(body), fallback)
            .await
    }

    /// PUT request with JSON body and response.
    #[instrument(skip(self, body, fallback))]
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: Option<&str>,
    ) -> Result<T> {
        let body = to_json_body(body);
        self.exchange(RequestMethod::Put, path, Vec::new(), Some(body), fallback)
            .await
    }

    /// DELETE request with optional JSON body and JSON response.
    #[instrument(skip(self, body, fallback))]
    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
        fallback: Option<&str>,
    ) -> Result<T> {
        let body = body.map(|v| Ok(RequestBody::Json(v)));
        self.exchange(RequestMethod::Delete, path, Vec::new(), body, fallback)
            .await
    }

    /// POST request with a multipart body and JSON response.
    #[instrument(skip(self, form, fallback))]
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        fallback: Option<&str>,
    ) -> Result<T> {
        self.exchange(
            RequestMethod::Post,
            path,
            Vec::new(),
            Some(Ok(RequestBody::Multipart(form))),
            fallback,
        )
        .await
    }

    /// POST request with JSON body whose response body is not needed.
    ///
    /// Only the status matters; a non-JSON success body is not an error.
    #[instrument(skip(self, body, fallback))]
    pub async fn post_discard<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: Option<&str>,
    ) -> Result<()> {
        let body = to_json_body(body);
        self.send(RequestMethod::Post, path, Vec::new(), Some(body))
            .await
            .map(|_| ())
            .map_err(|failure| normalize(failure, fallback))
    }

    /// One request, one response, one normalization on failure.
    async fn exchange<T: DeserializeOwned>(
        &self,
        method: RequestMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<std::result::Result<RequestBody, TransportFailure>>,
        fallback: Option<&str>,
    ) -> Result<T> {
        self.send(method, path, query, body)
            .await
            .and_then(|response| response.json::<T>())
            .map_err(|failure| normalize(failure, fallback))
    }

    async fn send(
        &self,
        method: RequestMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<std::result::Result<RequestBody, TransportFailure>>,
    ) -> std::result::Result<Response, TransportFailure> {
        let mut request = self.request(method, path)?.query_pairs(query);
        request = match body.transpose()? {
            Some(RequestBody::Json(value)) => request.json_value(value),
            Some(RequestBody::Multipart(form)) => request.multipart(form),
            None => request,
        };
        self.http.execute(request).await
    }
}

fn to_json_body<B: Serialize + ?Sized>(
    body: &B,
) -> std::result::Result<RequestBody, TransportFailure> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| TransportFailure::Request(format!("Failed to serialize request body: {}", e)))
}
