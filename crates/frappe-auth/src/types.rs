//! Login request and response types.

use serde::{Deserialize, Serialize};

/// Credentials accepted by the login endpoint.
///
/// Sensitive fields are redacted in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthCredentials {
    /// First login step.
    Password {
        username: String,
        password: String,
        device: Option<String>,
    },
    /// Second step of a two-factor login, using the `tmp_id` returned by
    /// the first step.
    Otp {
        otp: String,
        tmp_id: String,
        device: Option<String>,
    },
}

impl std::fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthCredentials::Password {
                username, device, ..
            } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .field("device", device)
                .finish(),
            AuthCredentials::Otp { tmp_id, device, .. } => f
                .debug_struct("Otp")
                .field("otp", &"[REDACTED]")
                .field("tmp_id", tmp_id)
                .field("device", device)
                .finish(),
        }
    }
}

impl AuthCredentials {
    /// Username and password.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthCredentials::Password {
            username: username.into(),
            password: password.into(),
            device: None,
        }
    }

    /// One-time password for a pending two-factor login.
    pub fn otp(otp: impl Into<String>, tmp_id: impl Into<String>) -> Self {
        AuthCredentials::Otp {
            otp: otp.into(),
            tmp_id: tmp_id.into(),
            device: None,
        }
    }

    /// Set the device identifier (`"desktop"`, `"mobile"`).
    pub fn with_device(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            AuthCredentials::Password { device, .. } | AuthCredentials::Otp { device, .. } => {
                *device = Some(value.into());
            }
        }
        self
    }

    /// Request body understood by the login endpoint.
    pub(crate) fn to_body(&self) -> LoginBody<'_> {
        match self {
            AuthCredentials::Password {
                username,
                password,
                device,
            } => LoginBody {
                usr: Some(username.as_str()),
                pwd: Some(password.as_str()),
                otp: None,
                tmp_id: None,
                device: device.as_deref(),
            },
            AuthCredentials::Otp {
                otp,
                tmp_id,
                device,
            } => LoginBody {
                usr: None,
                pwd: None,
                otp: Some(otp.as_str()),
                tmp_id: Some(tmp_id.as_str()),
                device: device.as_deref(),
            },
        }
    }
}

#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    usr: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pwd: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    otp: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tmp_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<&'a str>,
}

/// Response of the login endpoint.
///
/// A completed login carries `message`, `home_page` and `full_name`. When
/// two-factor authentication is pending, `verification` and `tmp_id` are
/// set instead and the login must be finished with
/// [`AuthCredentials::Otp`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmp_id: Option<String>,
}

impl AuthResponse {
    /// Whether the server asks for a second factor.
    pub fn requires_otp(&self) -> bool {
        self.verification.is_some() && self.tmp_id.is_some()
    }
}
