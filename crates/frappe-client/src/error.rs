//! Error types and failure normalization.
//!
//! Every failed request ends up as exactly one [`FrappeError`], produced by
//! [`normalize`]. Callers branch on [`FrappeError::exception`] and
//! [`FrappeError::http_status`] rather than on message text.

use serde_json::{Map, Value};
use tracing::debug;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, FrappeError>;

/// Message used when neither the server nor the caller provided one.
pub const DEFAULT_ERROR_MESSAGE: &str = "There was an error.";

/// The single error type surfaced to callers.
///
/// Mirrors the error envelope returned by the server, with the HTTP status
/// attached when a response was received.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FrappeError {
    /// Server-defined exception category, e.g. `frappe.exceptions.ValidationError`.
    /// Empty when the server did not report one.
    pub exception: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code, absent for failures without a response.
    pub http_status: Option<u16>,
    /// HTTP reason phrase.
    pub http_status_text: Option<String>,
    /// Raw `_server_messages` field (JSON-encoded list of messages).
    pub server_messages: Option<String>,
    /// Raw `exc_type` field.
    pub exc_type: Option<String>,
    /// Raw `exc` field (server traceback).
    pub exc: Option<String>,
    /// Underlying transport or decoding error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FrappeError {
    /// An error raised locally, before or without any server response.
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            exception: String::new(),
            message: message.into(),
            http_status: None,
            http_status_text: None,
            server_messages: None,
            exc_type: None,
            exc: None,
            source: None,
        }
    }

    /// Attach an underlying error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns true if the transport failed before any HTTP status was
    /// received (connection, DNS, TLS, timeout).
    pub fn is_network_error(&self) -> bool {
        self.http_status.is_none()
            && self
                .source
                .as_deref()
                .is_some_and(|e| e.is::<reqwest::Error>())
    }

    /// Returns true if the failure happened on this side without any HTTP
    /// exchange: an invalid URL, a request that could not be built, or a
    /// local file that could not be read.
    pub fn is_local_error(&self) -> bool {
        self.http_status.is_none() && !self.is_network_error()
    }

    /// Returns true for authentication or permission failures.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.http_status, Some(401 | 403))
            || self.is_exception("AuthenticationError")
            || self.is_exception("PermissionError")
    }

    /// Returns true if the requested document or method does not exist.
    pub fn is_not_found(&self) -> bool {
        self.http_status == Some(404) || self.is_exception("DoesNotExistError")
    }

    /// Returns true for server-side validation failures.
    pub fn is_validation_error(&self) -> bool {
        self.http_status == Some(417) || self.is_exception("ValidationError")
    }

    /// Whether the exception tag names `class`, with or without a module
    /// path (`ValidationError` matches `frappe.exceptions.ValidationError`).
    pub fn is_exception(&self, class: &str) -> bool {
        let tag = self.exc_type.as_deref().unwrap_or(&self.exception);
        let tag = tag.split(':').next().unwrap_or(tag).trim();
        tag == class || tag.rsplit('.').next() == Some(class)
    }
}

/// A failed transport exchange, before normalization.
#[derive(Debug)]
pub enum TransportFailure {
    /// The server answered with a non-success status.
    Response {
        status: u16,
        status_text: Option<String>,
        body: bytes::Bytes,
    },
    /// No usable response was received.
    Network(reqwest::Error),
    /// The status line arrived but reading the body failed.
    Body {
        status: u16,
        status_text: Option<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A success response whose body did not match the expected envelope.
    Decode {
        status: u16,
        source: serde_json::Error,
    },
    /// The request could not be built.
    Request(String),
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        TransportFailure::Network(err)
    }
}

/// Convert a transport failure into the caller-facing error.
///
/// Message precedence: the server's `message`, then `fallback` (when
/// non-empty), then [`DEFAULT_ERROR_MESSAGE`]. The exception tag defaults to
/// an empty string. Other diagnostic fields are copied as-is.
pub fn normalize(failure: TransportFailure, fallback: Option<&str>) -> FrappeError {
    let fallback = fallback
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_ERROR_MESSAGE);

    let mut error = FrappeError::local(fallback);

    match failure {
        TransportFailure::Response {
            status,
            status_text,
            body,
        } => {
            error.http_status = Some(status);
            error.http_status_text = status_text;
            if let Some(fields) = parse_body(&body) {
                apply_server_fields(&mut error, &fields);
            }
        }
        TransportFailure::Network(err) => {
            if let Some(status) = err.status() {
                error.http_status = Some(status.as_u16());
                error.http_status_text = status.canonical_reason().map(str::to_string);
            }
            error.source = Some(Box::new(err));
        }
        TransportFailure::Body {
            status,
            status_text,
            source,
        } => {
            error.http_status = Some(status);
            error.http_status_text = status_text;
            error.source = Some(source);
        }
        TransportFailure::Decode { status, source } => {
            error.http_status = Some(status);
            error.http_status_text = reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string);
            error.source = Some(Box::new(source));
        }
        TransportFailure::Request(detail) => {
            debug!(detail = %detail, "Request could not be built");
        }
    }

    debug!(
        status = ?error.http_status,
        exception = %error.exception,
        "Request failed"
    );

    error
}

fn parse_body(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn apply_server_fields(error: &mut FrappeError, fields: &Map<String, Value>) {
    if let Some(message) = text_field(fields, "message") {
        error.message = message;
    }
    if let Some(exception) = text_field(fields, "exception") {
        error.exception = exception;
    }
    error.server_messages = text_field(fields, "_server_messages");
    error.exc_type = text_field(fields, "exc_type");
    error.exc = text_field(fields, "exc");
}

/// Strings verbatim, other non-null values as compact JSON.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
