//! # frappe-file
//!
//! File uploads to a Frappe site, optionally attached to a document.
//!
//! The request is a multipart form POST. The composed headers (auth, CSRF,
//! site name, custom headers) still apply; the JSON content type is replaced
//! by the multipart one.
//!
//! ## Example
//!
//! ```rust,ignore
//! use frappe_sdk_file::{FileArgs, FrappeFileUpload, UploadFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), frappe_sdk_file::FrappeError> {
//!     let uploader = FrappeFileUpload::new("https://erp.example.com")?;
//!
//!     let file = UploadFile::from_path("./receipt.pdf").await?;
//!     let saved: serde_json::Value = uploader
//!         .upload_file(file, &FileArgs::new().folder("Home/Receipts"), None, None)
//!         .await?;
//!
//!     println!("{}", saved["file_url"]);
//!     Ok(())
//! }
//! ```

mod types;
mod upload;

pub use types::{FileArgs, ProgressCallback, UploadFile};
pub use upload::FrappeFileUpload;

pub use frappe_sdk_client::{FrappeError, Result};

/// Whitelisted method used when no upload path is given.
pub const DEFAULT_UPLOAD_METHOD: &str = "upload_file";

/// Size of the chunks the file body is streamed in.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;
