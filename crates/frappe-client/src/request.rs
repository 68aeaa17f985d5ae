//! HTTP request building.

use crate::headers::RequestHeaders;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request body content.
#[derive(Debug)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

/// Builder for a single outbound request.
#[derive(Debug)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: RequestHeaders,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: RequestHeaders::new(),
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Replace all headers.
    pub fn headers(mut self, headers: RequestHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Add or replace a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Add several query parameters.
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query_params.extend(pairs);
        self
    }

    /// Set JSON body. The composed `Content-Type` header is kept.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Set a multipart body. Any JSON `Content-Type` is dropped so the
    /// transport can set `multipart/form-data` with its boundary.
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.headers.remove("Content-Type");
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// The request method.
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// The absolute request URL, without query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The headers that will be sent.
    pub fn header_map(&self) -> &RequestHeaders {
        &self.headers
    }

    /// The query parameters that will be sent.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// The body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}
