//! Ambient execution context.
//!
//! When code runs inside a page served by the site itself, the host
//! environment knows the page origin and usually carries a CSRF token
//! injected by the server-side template. Outside such an environment
//! (services, CLIs, tests) neither exists. Header composition receives this
//! information through [`AmbientContext`] instead of probing globals.

use std::fmt;

/// Location of the page the client is running in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLocation {
    /// Scheme, host and optional port, e.g. `https://erp.example.com`.
    pub origin: String,
    /// Host name only, e.g. `erp.example.com`.
    pub hostname: String,
}

impl SiteLocation {
    /// Derive a location from a URL, returning `None` if it does not parse
    /// or has no host.
    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = url::Url::parse(url).ok()?;
        let hostname = parsed.host_str()?.to_string();
        Some(Self {
            origin: parsed.origin().ascii_serialization(),
            hostname,
        })
    }
}

/// Provider of page-level context consulted when composing request headers.
pub trait AmbientContext: Send + Sync + fmt::Debug {
    /// Where the page is served from, if running inside one.
    fn location(&self) -> Option<SiteLocation> {
        None
    }

    /// The CSRF token the server injected into the page, if any.
    fn csrf_token(&self) -> Option<String> {
        None
    }
}

/// No ambient page: no site-name header, no CSRF header.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAmbient;

impl AmbientContext for NoAmbient {}

/// Fixed ambient values, for processes that know the page context up front.
#[derive(Clone, Default)]
pub struct StaticAmbient {
    location: Option<SiteLocation>,
    csrf_token: Option<String>,
}

impl fmt::Debug for StaticAmbient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAmbient")
            .field("location", &self.location)
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StaticAmbient {
    /// An ambient context with neither location nor token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page location from a URL such as `https://erp.example.com/app`.
    pub fn with_page_url(mut self, url: &str) -> Self {
        self.location = SiteLocation::from_url(url);
        self
    }

    /// Set the page location explicitly.
    pub fn with_location(mut self, location: SiteLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the CSRF token found in the page.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }
}

impl AmbientContext for StaticAmbient {
    fn location(&self) -> Option<SiteLocation> {
        self.location.clone()
    }

    fn csrf_token(&self) -> Option<String> {
        self.csrf_token.clone()
    }
}
