//! # frappe-db
//!
//! Document operations against the Frappe resource API.
//!
//! ## Supported Operations
//!
//! - **Get** a single document by doctype and name
//! - **List** documents with fields, filters, ordering, grouping and paging
//! - **Create**, **update** and **delete** documents
//! - **Count** documents matching filters
//! - **Last document** by creation time (or a custom order)
//!
//! ## Example
//!
//! ```rust,ignore
//! use frappe_sdk_db::{Document, Filter, FrappeDb, GetDocListArgs, OrderBy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), frappe_sdk_db::FrappeError> {
//!     let db = FrappeDb::new("https://erp.example.com")?;
//!
//!     let note: Document = db
//!         .create_doc("Note", &serde_json::json!({"title": "Standup"}))
//!         .await?;
//!
//!     let recent: Vec<Document> = db
//!         .get_doc_list(
//!             "Note",
//!             Some(&GetDocListArgs::new()
//!                 .fields(["name", "title"])
//!                 .filter(Filter::eq("public", 1))
//!                 .order_by(OrderBy::desc("modified"))
//!                 .limit(10)),
//!         )
//!         .await?;
//!
//!     let count = db.get_count("Note", None, false, false).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod filter;
mod types;

pub use client::FrappeDb;
pub use filter::{Filter, FilterOperator};
pub use types::{DeleteResponse, Document, FrappeDoc, GetDocListArgs, OrderBy, SortOrder};

pub use frappe_sdk_client::{FrappeError, Result};

/// Base path of the document resource API.
pub const RESOURCE_PATH: &str = "/api/resource";

/// Whitelisted method returning a document count.
pub const GET_COUNT_PATH: &str = "/api/method/frappe.client.get_count";
