//! Upload inputs.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::{Map, Value};

use frappe_sdk_client::{FrappeError, Result};

/// Upload progress callback: `(bytes_uploaded, total_bytes)`.
///
/// May fire any number of times, including zero; `bytes_uploaded` never
/// decreases.
pub type ProgressCallback = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// A file held in memory, ready to upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Bytes,
    /// MIME type; guessed from `file_name` when unset.
    pub content_type: Option<String>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("size", &self.content.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk. The name is the path's final component and
    /// the MIME type is guessed from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await.map_err(|e| {
            FrappeError::local(format!("Failed to read {}: {}", path.display(), e)).with_source(e)
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Ok(Self {
            file_name,
            content: Bytes::from(content),
            content_type: Some(content_type),
        })
    }

    /// Size in bytes.
    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub(crate) fn mime_type(&self) -> String {
        match &self.content_type {
            Some(content_type) => content_type.clone(),
            None => mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .to_string(),
        }
    }
}

/// Where and how the uploaded file is stored.
///
/// `fieldname` only applies when both `doctype` and `docname` are set.
///
/// # Example
///
/// ```rust,ignore
/// let args = FileArgs::new()
///     .private(true)
///     .attach_to("ToDo", "TD-0001")
///     .fieldname("attachment");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileArgs {
    pub is_private: bool,
    /// Folder in the file manager, e.g. `Home/Attachments`.
    pub folder: Option<String>,
    /// Register an existing URL instead of uploading content.
    pub file_url: Option<String>,
    pub doctype: Option<String>,
    pub docname: Option<String>,
    /// Attach field on the document to set to the new file URL.
    pub fieldname: Option<String>,
    /// Extra form fields passed to the upload method.
    pub other_data: Option<Map<String, Value>>,
}

impl FileArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn file_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self
    }

    /// Attach the file to a document.
    pub fn attach_to(mut self, doctype: impl Into<String>, docname: impl Into<String>) -> Self {
        self.doctype = Some(doctype.into());
        self.docname = Some(docname.into());
        self
    }

    pub fn fieldname(mut self, fieldname: impl Into<String>) -> Self {
        self.fieldname = Some(fieldname.into());
        self
    }

    /// Add an extra form field.
    pub fn other(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.other_data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Text fields of the upload form, in the order they are sent.
    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();

        if self.is_private {
            fields.push(("is_private".to_string(), "1".to_string()));
        }
        if let Some(folder) = non_empty(&self.folder) {
            fields.push(("folder".to_string(), folder.to_string()));
        }
        if let Some(file_url) = non_empty(&self.file_url) {
            fields.push(("file_url".to_string(), file_url.to_string()));
        }
        if let (Some(doctype), Some(docname)) = (non_empty(&self.doctype), non_empty(&self.docname)) {
            fields.push(("doctype".to_string(), doctype.to_string()));
            fields.push(("docname".to_string(), docname.to_string()));
            if let Some(fieldname) = non_empty(&self.fieldname) {
                fields.push(("fieldname".to_string(), fieldname.to_string()));
            }
        }
        if let Some(other) = &self.other_data {
            for (key, value) in other {
                let text = match value {
                    Value::Null => continue,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                fields.push((key.clone(), text));
            }
        }

        fields
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
