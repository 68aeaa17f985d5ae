//! Client configuration.
//!
//! Two layers live here:
//!
//! - [`AppConfig`] describes *who* is talking to *which* site: base URL,
//!   token authentication and custom headers. It is immutable once built and
//!   every request derives its headers from exactly one snapshot of it.
//! - [`ClientConfig`] tunes the underlying HTTP transport (timeouts, pooling,
//!   compression, cookies). The library itself adds no retry or timeout
//!   policy on top of what is configured here.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{FrappeError, Result};

/// Name given to an app when the caller does not provide one.
pub const DEFAULT_APP_NAME: &str = "FrappeApp";

/// How the `Authorization` header is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No `Authorization` header; rely on the session cookie (if any).
    #[default]
    None,
    /// `Authorization: Bearer <token>`, e.g. an OAuth access token.
    Bearer,
    /// `Authorization: token <token>`, the backend's API key scheme
    /// (`api_key:api_secret`).
    Token,
}

impl AuthMode {
    /// Scheme prefix used in the `Authorization` header, if any.
    pub fn scheme(&self) -> Option<&'static str> {
        match self {
            AuthMode::None => None,
            AuthMode::Bearer => Some("Bearer"),
            AuthMode::Token => Some("token"),
        }
    }
}

/// Caller-supplied source of authentication credentials.
///
/// The provider is invoked once per outbound request so that tokens fetched
/// from a refreshing auth provider are always current.
#[derive(Clone)]
pub struct TokenProvider(Arc<dyn Fn() -> String + Send + Sync>);

impl TokenProvider {
    /// Wrap a closure returning the current token.
    pub fn new<F>(provider: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self(Arc::new(provider))
    }

    /// A provider that always returns the same token.
    pub fn fixed(token: impl Into<String>) -> Self {
        let token = token.into();
        Self::new(move || token.clone())
    }

    /// A provider for an API key pair, yielding `api_key:api_secret`.
    ///
    /// Use together with [`AuthMode::Token`].
    pub fn api_key(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::fixed(format!("{}:{}", api_key.into(), api_secret.into()))
    }

    /// Obtain the current token.
    pub fn token(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenProvider([REDACTED])")
    }
}

/// Immutable description of a site and how to authenticate against it.
///
/// # Example
///
/// ```rust
/// use frappe_sdk_client::{AppConfig, AuthMode, TokenProvider};
///
/// let config = AppConfig::new("https://erp.example.com")
///     .with_name("Inventory")
///     .with_token(AuthMode::Token, TokenProvider::api_key("key", "secret"))
///     .with_header("X-Request-Source", "sync-job");
///
/// assert_eq!(config.base_url(), "https://erp.example.com");
/// ```
#[derive(Clone)]
pub struct AppConfig {
    base_url: String,
    name: String,
    auth_mode: AuthMode,
    token_provider: Option<TokenProvider>,
    custom_headers: Vec<(String, String)>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.custom_headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("name", &self.name)
            .field("auth_mode", &self.auth_mode)
            .field("token_provider", &self.token_provider.as_ref().map(|_| "[REDACTED]"))
            .field("custom_headers", &header_names)
            .finish()
    }
}

impl AppConfig {
    /// Create a configuration for the site at `base_url`.
    ///
    /// A trailing slash is trimmed. An empty URL means "same origin as the
    /// ambient context", see [`crate::AmbientContext`].
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            name: DEFAULT_APP_NAME.to_string(),
            auth_mode: AuthMode::None,
            token_provider: None,
            custom_headers: Vec::new(),
        }
    }

    /// Set the application name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable token authentication with the given scheme and provider.
    pub fn with_token(mut self, mode: AuthMode, provider: TokenProvider) -> Self {
        self.auth_mode = mode;
        self.token_provider = Some(provider);
        self
    }

    /// Set only the auth mode, leaving the provider untouched.
    pub fn with_auth_mode(mut self, mode: AuthMode) -> Self {
        self.auth_mode = mode;
        self
    }

    /// Add a header sent with every request. Custom headers are applied last
    /// and override the library's own headers on collision.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Add several custom headers at once.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.custom_headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Check that the base URL is either empty or an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Ok(());
        }
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| FrappeError::local(format!("Invalid base URL '{}': {}", self.base_url, e)).with_source(e))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(FrappeError::local(format!(
                "Unsupported URL scheme '{}' in base URL",
                other
            ))),
        }
    }

    /// The site base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured auth mode.
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    /// The token provider, if token auth was configured.
    pub fn token_provider(&self) -> Option<&TokenProvider> {
        self.token_provider.as_ref()
    }

    /// Custom headers in insertion order.
    pub fn custom_headers(&self) -> &[(String, String)] {
        &self.custom_headers
    }

    /// Whether an `Authorization` header will be produced.
    pub fn uses_token(&self) -> bool {
        self.auth_mode != AuthMode::None && self.token_provider.is_some()
    }
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Total request deadline. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Pool idle timeout.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// User-Agent header value.
    pub user_agent: String,
    /// Accept gzip/deflate compressed responses.
    pub accept_compressed: bool,
    /// Keep session cookies between requests (login, CSRF, `sid`).
    pub cookie_store: bool,
    /// Whether to enable request/response tracing.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: crate::USER_AGENT.to_string(),
            accept_compressed: true,
            cookie_store: true,
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set a total request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set pool idle timeout.
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Accept compressed responses.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.accept_compressed = enabled;
        self
    }

    /// Keep or drop cookies between requests.
    pub fn with_cookie_store(mut self, enabled: bool) -> Self {
        self.config.cookie_store = enabled;
        self
    }

    /// Enable or disable request/response tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
