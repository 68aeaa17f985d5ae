//! Request header composition.
//!
//! [`build_headers`] is recomputed for every request: the token provider may
//! hand out a fresh credential on each call, so nothing here is cached.

use crate::ambient::AmbientContext;
use crate::config::AppConfig;

/// Header carrying the site host for multi-tenant deployments.
pub const SITE_NAME_HEADER: &str = "X-Frappe-Site-Name";

/// Header carrying the anti-forgery token.
pub const CSRF_TOKEN_HEADER: &str = "X-Frappe-CSRF-Token";

/// Literal left in a page when the template did not render a real token.
pub const CSRF_TOKEN_PLACEHOLDER: &str = "{{ csrf_token }}";

/// Ordered header map. Names compare case-insensitively; inserting an
/// existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: Vec<(String, String)>,
}

impl RequestHeaders {
    /// An empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a header value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Remove a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self
            .entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(idx).1)
    }

    /// Whether a header is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compose the headers for one outbound request.
///
/// Rules, in order:
/// 1. `Accept: application/json` and a JSON `Content-Type`.
/// 2. `Authorization: <scheme> <token>` when token auth is configured.
/// 3. `X-Frappe-Site-Name` with the page host, when running inside a page
///    and the base URL is empty or has the page's origin.
/// 4. `X-Frappe-CSRF-Token` when the page carries a real token.
/// 5. Custom headers, overriding everything above.
pub fn build_headers(config: &AppConfig, ambient: &dyn AmbientContext) -> RequestHeaders {
    let mut headers = RequestHeaders::new();
    headers.insert("Accept", "application/json");
    headers.insert("Content-Type", "application/json; charset=utf-8");

    if let (Some(scheme), Some(provider)) = (config.auth_mode().scheme(), config.token_provider()) {
        headers.insert("Authorization", format!("{} {}", scheme, provider.token()));
    }

    if let Some(location) = ambient.location() {
        if is_same_origin(config.base_url(), &location.origin) {
            headers.insert(SITE_NAME_HEADER, location.hostname);
        }
    }

    if let Some(token) = ambient.csrf_token() {
        if !token.is_empty() && token != CSRF_TOKEN_PLACEHOLDER {
            headers.insert(CSRF_TOKEN_HEADER, token);
        }
    }

    for (name, value) in config.custom_headers() {
        headers.insert(name.clone(), value.clone());
    }

    headers
}

/// An empty base URL is relative to the page and therefore same-origin.
fn is_same_origin(base_url: &str, page_origin: &str) -> bool {
    if base_url.is_empty() {
        return true;
    }
    match url::Url::parse(base_url) {
        Ok(parsed) => parsed.origin().ascii_serialization() == page_origin,
        Err(_) => base_url == page_origin,
    }
}
