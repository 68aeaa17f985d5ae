//! Document API client.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use frappe_sdk_client::response::{DataEnvelope, MessageEnvelope};
use frappe_sdk_client::{
    normalize, AppConfig, ClientConfig, FrappeClient, FrappeError, Result, TransportFailure,
};

use crate::filter::Filter;
use crate::types::{DeleteResponse, GetDocListArgs, OrderBy};
use crate::{GET_COUNT_PATH, RESOURCE_PATH};

const GET_DOC_ERROR: &str = "There was an error while fetching the document.";
const GET_DOC_LIST_ERROR: &str = "There was an error while fetching the documents.";
const CREATE_DOC_ERROR: &str = "There was an error while creating the document.";
const UPDATE_DOC_ERROR: &str = "There was an error while updating the document.";
const DELETE_DOC_ERROR: &str = "There was an error while deleting the document.";
const GET_COUNT_ERROR: &str = "There was an error while getting the document count.";

/// Client for the document resource API.
///
/// Return types are generic: use [`Document`](crate::Document) for
/// schemaless access, [`FrappeDoc<T>`](crate::FrappeDoc) for typed access
/// with the standard fields, or any `Deserialize` type of your own.
///
/// # Example
///
/// ```rust,ignore
/// use frappe_sdk_db::{Document, Filter, FrappeDb, GetDocListArgs};
///
/// let db = FrappeDb::new("https://erp.example.com")?;
///
/// let created: Document = db.create_doc("Note", &json!({"title": "x"})).await?;
/// let open: Vec<Document> = db
///     .get_doc_list("Note", Some(&GetDocListArgs::new().filter(Filter::eq("public", 1))))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct FrappeDb {
    client: FrappeClient,
}

impl FrappeDb {
    /// Create a document client for the site at `url`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = FrappeClient::new(AppConfig::new(url))?;
        Ok(Self { client })
    }

    /// Create a document client with explicit configuration.
    pub fn with_config(config: AppConfig, client_config: ClientConfig) -> Result<Self> {
        let client = FrappeClient::with_config(config, client_config)?;
        Ok(Self { client })
    }

    /// Create a document client from an existing FrappeClient.
    pub fn from_client(client: FrappeClient) -> Self {
        Self { client }
    }

    /// Get the underlying FrappeClient.
    pub fn inner(&self) -> &FrappeClient {
        &self.client
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Fetch one document.
    ///
    /// An empty `docname` requests `/api/resource/{doctype}/`, which single
    /// doctypes (settings documents) answer with their only record.
    #[instrument(skip(self))]
    pub async fn get_doc<T: DeserializeOwned>(&self, doctype: &str, docname: &str) -> Result<T> {
        let envelope: DataEnvelope<T> = self
            .client
            .get_json(&doc_path(doctype, docname), Vec::new(), Some(GET_DOC_ERROR))
            .await?;
        Ok(envelope.data)
    }

    /// List documents of a doctype.
    ///
    /// Without `args` no query parameters are sent and the server applies
    /// its own defaults (names only, first page).
    #[instrument(skip(self, args))]
    pub async fn get_doc_list<T: DeserializeOwned>(
        &self,
        doctype: &str,
        args: Option<&GetDocListArgs>,
    ) -> Result<Vec<T>> {
        let query = match args {
            Some(args) => args
                .to_query()
                .map_err(|e| query_error(e, GET_DOC_LIST_ERROR))?,
            None => Vec::new(),
        };

        let envelope: DataEnvelope<Vec<T>> = self
            .client
            .get_json(&list_path(doctype), query, Some(GET_DOC_LIST_ERROR))
            .await?;
        Ok(envelope.data)
    }

    /// Count documents matching `filters`.
    ///
    /// `cache` and `debug` are only sent when true.
    #[instrument(skip(self, filters, debug))]
    pub async fn get_count(
        &self,
        doctype: &str,
        filters: Option<&[Filter]>,
        cache: bool,
        debug: bool,
    ) -> Result<u64> {
        let mut query = vec![("doctype".to_string(), doctype.to_string())];
        if let Some(filters) = filters {
            let filters =
                serde_json::to_string(filters).map_err(|e| query_error(e, GET_COUNT_ERROR))?;
            query.push(("filters".to_string(), filters));
        }
        if cache {
            query.push(("cache".to_string(), "true".to_string()));
        }
        if debug {
            query.push(("debug".to_string(), "true".to_string()));
        }

        let envelope: MessageEnvelope<u64> = self
            .client
            .get_json(GET_COUNT_PATH, query, Some(GET_COUNT_ERROR))
            .await?;
        Ok(envelope.message)
    }

    /// Fetch the most recent document.
    ///
    /// Lists one name ordered by `creation desc` (or the order in `args`,
    /// whose filters also apply), then fetches that document. Returns
    /// `T::default()` when nothing matches.
    #[instrument(skip(self, args))]
    pub async fn get_last_doc<T: DeserializeOwned + Default>(
        &self,
        doctype: &str,
        args: Option<&GetDocListArgs>,
    ) -> Result<T> {
        let mut query_args = args.cloned().unwrap_or_default();
        if query_args.order_by.is_none() {
            query_args.order_by = Some(OrderBy::desc("creation"));
        }
        let query_args = query_args.limit(1).fields(["name"]);

        let names: Vec<NameOnly> = self.get_doc_list(doctype, Some(&query_args)).await?;

        match names.into_iter().next() {
            Some(first) => self.get_doc(doctype, &first.name).await,
            None => Ok(T::default()),
        }
    }

    // =========================================================================
    // Write
    // =========================================================================

    /// Insert a new document; returns it as saved, with server-assigned
    /// fields such as `name`.
    #[instrument(skip(self, value))]
    pub async fn create_doc<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        doctype: &str,
        value: &B,
    ) -> Result<T> {
        let envelope: DataEnvelope<T> = self
            .client
            .post_json(&list_path(doctype), value, Some(CREATE_DOC_ERROR))
            .await?;
        Ok(envelope.data)
    }

    /// Update the given fields of a document; returns the full document.
    #[instrument(skip(self, value))]
    pub async fn update_doc<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        doctype: &str,
        docname: &str,
        value: &B,
    ) -> Result<T> {
        let envelope: DataEnvelope<T> = self
            .client
            .put_json(&doc_path(doctype, docname), value, Some(UPDATE_DOC_ERROR))
            .await?;
        Ok(envelope.data)
    }

    /// Delete a document.
    ///
    /// A success response without a `message` field is reported as an error.
    #[instrument(skip(self))]
    pub async fn delete_doc(&self, doctype: &str, docname: Option<&str>) -> Result<DeleteResponse> {
        self.client
            .delete_json(
                &doc_path(doctype, docname.unwrap_or_default()),
                None,
                Some(DELETE_DOC_ERROR),
            )
            .await
    }
}

#[derive(Debug, Default, Deserialize)]
struct NameOnly {
    name: String,
}

fn list_path(doctype: &str) -> String {
    format!("{}/{}", RESOURCE_PATH, urlencoding::encode(doctype))
}

fn doc_path(doctype: &str, docname: &str) -> String {
    format!(
        "{}/{}/{}",
        RESOURCE_PATH,
        urlencoding::encode(doctype),
        urlencoding::encode(docname)
    )
}

fn query_error(err: serde_json::Error, fallback: &str) -> FrappeError {
    normalize(
        TransportFailure::Request(format!("Failed to serialize query: {}", err)),
        Some(fallback),
    )
}
