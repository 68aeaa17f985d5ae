//! HTTP response handling and response envelopes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::TransportFailure;

/// A successful (2xx) response with its body fully read.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: reqwest::header::HeaderMap,
    body: bytes::Bytes,
}

impl Response {
    pub(crate) fn new(status: u16, headers: reqwest::header::HeaderMap, body: bytes::Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// The raw body.
    pub fn bytes(&self) -> &bytes::Bytes {
        &self.body
    }

    /// Deserialize the body as JSON.
    ///
    /// An empty body decodes as JSON `null`, so `()`/`Option`/`Value`
    /// targets accept bodiless success responses.
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, TransportFailure> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(|source| TransportFailure::Decode {
            status: self.status,
            source,
        })
    }
}

/// `{"data": ...}` envelope used by the resource endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// `{"message": ...}` envelope used by whitelisted method endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MessageEnvelope<T> {
    pub message: T,
}
