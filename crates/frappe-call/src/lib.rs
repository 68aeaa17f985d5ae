//! # frappe-call
//!
//! Calls to whitelisted server methods under `/api/method/`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use frappe_sdk_call::{FrappeCall, MethodResponse};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), frappe_sdk_call::FrappeError> {
//!     let call = FrappeCall::new("https://erp.example.com")?;
//!
//!     let pong: MethodResponse<String> = call.get("frappe.ping", None).await?;
//!
//!     let value: MethodResponse<serde_json::Value> = call
//!         .post(
//!             "frappe.client.set_value",
//!             Some(&json!({"doctype": "Note", "name": "N-1", "fieldname": "title", "value": "z"})),
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

mod call;

pub use call::FrappeCall;

pub use frappe_sdk_client::{FrappeError, Result};

/// `{"message": ...}` wrapper most whitelisted methods return.
pub type MethodResponse<T> = frappe_sdk_client::MessageEnvelope<T>;

/// Base path of whitelisted methods.
pub const METHOD_PATH: &str = "/api/method";
