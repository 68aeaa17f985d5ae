//! # frappe-auth
//!
//! Session authentication against a Frappe site.
//!
//! ## Security
//!
//! - Passwords and OTPs are redacted in Debug output
//! - Tracing spans skip credential parameters
//!
//! ## Supported Operations
//!
//! - **Username/password login** - establishes a session cookie
//! - **OTP verification** - second step of two-factor login
//! - **Logged-in user** - who the current session belongs to
//! - **Logout** and **password reset email**
//!
//! ## Example
//!
//! ```rust,ignore
//! use frappe_sdk_auth::{AuthCredentials, FrappeAuth};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), frappe_sdk_auth::FrappeError> {
//!     let auth = FrappeAuth::new("https://erp.example.com")?;
//!
//!     let response = auth
//!         .login_with_username_password(&AuthCredentials::password("Administrator", "admin"))
//!         .await?;
//!     println!("{:?}", response.full_name);
//!
//!     let user = auth.get_logged_in_user().await?;
//!     auth.logout().await?;
//!     Ok(())
//! }
//! ```

mod auth;
mod types;

pub use auth::FrappeAuth;
pub use types::{AuthCredentials, AuthResponse};

pub use frappe_sdk_client::{FrappeError, Result};

/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/method/login";

/// Endpoint returning the session user.
pub const LOGGED_USER_PATH: &str = "/api/method/frappe.auth.get_logged_user";

/// Logout endpoint.
pub const LOGOUT_PATH: &str = "/api/method/logout";

/// Server command that sends the password reset email.
pub const RESET_PASSWORD_CMD: &str = "frappe.core.doctype.user.user.reset_password";
