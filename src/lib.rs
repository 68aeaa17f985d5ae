//! # frappe-sdk
//!
//! A client library for the Frappe Framework REST API.
//!
//! [`FrappeApp`] holds one site configuration and hands out a client per
//! API group. Every group talks through the same transport, so a session
//! cookie set by [`FrappeApp::auth`] is sent by the others too.
//!
//! ## Security
//!
//! - Tokens, passwords and OTPs are redacted in Debug output
//! - Tracing spans skip credential parameters and request bodies
//!
//! ## Crates
//!
//! - **frappe-sdk-client** - Core HTTP client: configuration, header composition, error normalization
//! - **frappe-sdk-auth** - Login (password and OTP), logged-in user, logout, password reset
//! - **frappe-sdk-db** - Document CRUD, lists with filters, counts
//! - **frappe-sdk-call** - Whitelisted method calls
//! - **frappe-sdk-file** - File uploads with progress
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use frappe_sdk::{AppConfig, AuthMode, FrappeApp, TokenProvider};
//! use frappe_sdk::db::Document;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), frappe_sdk::FrappeError> {
//!     let app = FrappeApp::with_config(
//!         AppConfig::new("https://erp.example.com")
//!             .with_token(AuthMode::Token, TokenProvider::api_key("key", "secret")),
//!         Default::default(),
//!     )?;
//!
//!     let note: Document = app
//!         .db()
//!         .create_doc("Note", &serde_json::json!({"title": "Hello"}))
//!         .await?;
//!
//!     let same: Document = app.db().get_doc("Note", note["name"].as_str().unwrap_or_default()).await?;
//!     println!("{}", same["title"]);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tracing::debug;

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use frappe_sdk_auth as auth;
#[cfg(feature = "call")]
pub use frappe_sdk_call as call;
pub use frappe_sdk_client as client;
#[cfg(feature = "db")]
pub use frappe_sdk_db as db;
#[cfg(feature = "file")]
pub use frappe_sdk_file as file;

// Re-export commonly used types at the top level
pub use frappe_sdk_client::{
    AmbientContext, AppConfig, AuthMode, ClientConfig, FrappeClient, FrappeError, NoAmbient,
    Result, SiteLocation, StaticAmbient, TokenProvider,
};

#[cfg(feature = "auth")]
pub use frappe_sdk_auth::FrappeAuth;
#[cfg(feature = "call")]
pub use frappe_sdk_call::FrappeCall;
#[cfg(feature = "db")]
pub use frappe_sdk_db::FrappeDb;
#[cfg(feature = "file")]
pub use frappe_sdk_file::FrappeFileUpload;

/// A Frappe site and the entry point to its API groups.
///
/// Each accessor returns a fresh group client carrying a copy of the
/// configuration and sharing the transport.
#[derive(Debug, Clone)]
pub struct FrappeApp {
    client: FrappeClient,
}

impl FrappeApp {
    /// Create an app for the site at `url`, without token authentication.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_config(AppConfig::new(url), ClientConfig::default())
    }

    /// Create an app with explicit site and transport configuration.
    pub fn with_config(config: AppConfig, client_config: ClientConfig) -> Result<Self> {
        debug!(
            url = %config.base_url(),
            name = %config.name(),
            auth_mode = ?config.auth_mode(),
            "Creating Frappe app"
        );
        let client = FrappeClient::with_config(config, client_config)?;
        Ok(Self { client })
    }

    /// Create an app from an existing FrappeClient.
    pub fn from_client(client: FrappeClient) -> Self {
        Self { client }
    }

    /// Use the given ambient context (page origin, CSRF token) for every
    /// group handed out afterwards.
    pub fn with_ambient(mut self, ambient: Arc<dyn AmbientContext>) -> Self {
        self.client = self.client.with_ambient(ambient);
        self
    }

    /// Site base URL.
    pub fn url(&self) -> &str {
        self.client.base_url()
    }

    /// App name.
    pub fn name(&self) -> &str {
        self.client.config().name()
    }

    /// The site configuration.
    pub fn config(&self) -> &AppConfig {
        self.client.config()
    }

    /// Get the underlying FrappeClient.
    pub fn inner(&self) -> &FrappeClient {
        &self.client
    }

    /// Authentication group.
    #[cfg(feature = "auth")]
    pub fn auth(&self) -> FrappeAuth {
        FrappeAuth::from_client(self.client.clone())
    }

    /// Document group.
    #[cfg(feature = "db")]
    pub fn db(&self) -> FrappeDb {
        FrappeDb::from_client(self.client.clone())
    }

    /// File upload group.
    #[cfg(feature = "file")]
    pub fn file(&self) -> FrappeFileUpload {
        FrappeFileUpload::from_client(self.client.clone())
    }

    /// Method call group.
    #[cfg(feature = "call")]
    pub fn call(&self) -> FrappeCall {
        FrappeCall::from_client(self.client.clone())
    }
}
