//! Core HTTP transport.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{FrappeError, TransportFailure};
use crate::request::{RequestBody, RequestBuilder, RequestMethod};
use crate::response::Response;

/// HTTP transport shared by every capability group of an app.
///
/// Cloning is cheap and clones share the connection pool and cookie jar,
/// so a session established through one group is seen by the others.
#[derive(Debug, Clone)]
pub struct FrappeHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl FrappeHttpClient {
    /// Create a new HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self, FrappeError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .cookie_store(config.cookie_store)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let inner = builder.build().map_err(|e| {
            FrappeError::local(format!("Failed to build HTTP client: {}", e)).with_source(e)
        })?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self, FrappeError> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Create a PUT request builder.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Put, url)
    }

    /// Create a DELETE request builder.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Delete, url)
    }

    /// Execute a request once.
    ///
    /// Non-2xx responses are returned as [`TransportFailure::Response`] with
    /// the body read, so the caller can normalize them.
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, TransportFailure> {
        let RequestBuilder {
            method,
            url,
            headers,
            query_params,
            body,
        } = request;

        let mut target = url::Url::parse(&url)
            .map_err(|e| TransportFailure::Request(format!("Invalid request URL {}: {}", url, e)))?;
        if !query_params.is_empty() {
            target.query_pairs_mut().extend_pairs(&query_params);
        }

        let mut req = self.inner.request(method.to_reqwest(), target);

        for (name, value) in headers.iter() {
            req = req.header(name, value);
        }

        if let Some(body) = body {
            req = match body {
                RequestBody::Json(value) => {
                    let bytes = serde_json::to_vec(&value)
                        .map_err(|e| TransportFailure::Request(e.to_string()))?;
                    req.body(bytes)
                }
                RequestBody::Multipart(form) => req.multipart(form),
            };
        }

        if self.config.enable_tracing {
            debug!(?method, url = %url, "Sending request");
        }

        let response = req.send().await?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportFailure::Body {
                status: status.as_u16(),
                status_text: status.canonical_reason().map(str::to_string),
                source: Box::new(e),
            })?;

        if self.config.enable_tracing {
            if status.is_success() {
                debug!(status = status.as_u16(), content_length = bytes.len(), "Response received");
            } else {
                info!(status = status.as_u16(), content_length = bytes.len(), "Non-success response");
            }
        }

        if !status.is_success() {
            return Err(TransportFailure::Response {
                status: status.as_u16(),
                status_text: status.canonical_reason().map(str::to_string),
                body: bytes,
            });
        }

        Ok(Response::new(status.as_u16(), response_headers, bytes))
    }
}
