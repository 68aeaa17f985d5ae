//! Authentication operations.

use tracing::instrument;

use frappe_sdk_client::response::MessageEnvelope;
use frappe_sdk_client::{AppConfig, ClientConfig, FrappeClient, Result};

use crate::types::{AuthCredentials, AuthResponse};
use crate::{LOGGED_USER_PATH, LOGIN_PATH, LOGOUT_PATH, RESET_PASSWORD_CMD};

/// Session authentication client.
///
/// Login state lives in the transport's cookie jar, so an instance obtained
/// from the same app as the other capability clients shares their session.
#[derive(Debug, Clone)]
pub struct FrappeAuth {
    client: FrappeClient,
}

impl FrappeAuth {
    /// Create an auth client for the site at `url`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = FrappeClient::new(AppConfig::new(url))?;
        Ok(Self { client })
    }

    /// Create an auth client with explicit configuration.
    pub fn with_config(config: AppConfig, client_config: ClientConfig) -> Result<Self> {
        let client = FrappeClient::with_config(config, client_config)?;
        Ok(Self { client })
    }

    /// Create an auth client from an existing FrappeClient.
    pub fn from_client(client: FrappeClient) -> Self {
        Self { client }
    }

    /// Get the underlying FrappeClient.
    pub fn inner(&self) -> &FrappeClient {
        &self.client
    }

    /// Log in with username/password, or finish a two-factor login with an OTP.
    #[instrument(skip(self, credentials))]
    pub async fn login_with_username_password(
        &self,
        credentials: &AuthCredentials,
    ) -> Result<AuthResponse> {
        self.client
            .post_json(
                LOGIN_PATH,
                &credentials.to_body(),
                Some("There was an error while logging in"),
            )
            .await
    }

    /// Get the user the current session belongs to (`Guest` when anonymous).
    #[instrument(skip(self))]
    pub async fn get_logged_in_user(&self) -> Result<String> {
        let response: MessageEnvelope<String> = self
            .client
            .get_json(
                LOGGED_USER_PATH,
                Vec::new(),
                Some("There was an error while fetching the logged in user"),
            )
            .await?;
        Ok(response.message)
    }

    /// End the current session.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.client
            .post_discard(
                LOGOUT_PATH,
                &serde_json::json!({}),
                Some("There was an error while logging out"),
            )
            .await
    }

    /// Ask the server to email a password reset link to `user`.
    #[instrument(skip(self, user))]
    pub async fn forget_password(&self, user: &str) -> Result<()> {
        self.client
            .post_discard(
                "/",
                &serde_json::json!({
                    "cmd": RESET_PASSWORD_CMD,
                    "user": user,
                }),
                Some("There was an error sending password reset email"),
            )
            .await
    }
}
