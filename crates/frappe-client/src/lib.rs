//! # frappe-client
//!
//! Core HTTP client infrastructure for the Frappe REST/RPC API.
//!
//! This crate provides the pieces every capability crate builds on:
//! - Immutable app configuration with token authentication
//! - Per-request header composition (auth, site name, CSRF, custom headers)
//! - A shared HTTP transport with connection pooling and a cookie jar
//! - Normalization of every failed request into a single error type
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (frappe-auth, frappe-db, frappe-call, frappe-file)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     FrappeClient                            │
//! │  - Holds AppConfig + ambient context + transport            │
//! │  - Composes headers per request (build_headers)             │
//! │  - Typed JSON methods, failures go through normalize()      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   FrappeHttpClient                          │
//! │  - Raw HTTP: pooling, compression, cookies, timeouts        │
//! │  - Reports non-2xx responses as TransportFailure            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use frappe_sdk_client::{AppConfig, AuthMode, FrappeClient, TokenProvider};
//! use frappe_sdk_client::response::MessageEnvelope;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), frappe_sdk_client::FrappeError> {
//!     let config = AppConfig::new("https://erp.example.com")
//!         .with_token(AuthMode::Token, TokenProvider::api_key("key", "secret"));
//!     let client = FrappeClient::new(config)?;
//!
//!     let user: MessageEnvelope<String> = client
//!         .get_json("/api/method/frappe.auth.get_logged_user", Vec::new(), None)
//!         .await?;
//!     println!("{}", user.message);
//!
//!     Ok(())
//! }
//! ```

mod ambient;
mod client;
mod config;
mod error;
mod frappe_client;
mod headers;
mod request;
pub mod response;

pub use ambient::{AmbientContext, NoAmbient, SiteLocation, StaticAmbient};
pub use client::FrappeHttpClient;
pub use config::{
    AppConfig, AuthMode, ClientConfig, ClientConfigBuilder, TokenProvider, DEFAULT_APP_NAME,
};
pub use error::{normalize, FrappeError, Result, TransportFailure, DEFAULT_ERROR_MESSAGE};
pub use frappe_client::FrappeClient;
pub use headers::{
    build_headers, RequestHeaders, CSRF_TOKEN_HEADER, CSRF_TOKEN_PLACEHOLDER, SITE_NAME_HEADER,
};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{DataEnvelope, MessageEnvelope, Response};

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("frappe-sdk/", env!("CARGO_PKG_VERSION"));
