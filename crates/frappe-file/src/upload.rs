//! File upload client.

use bytes::Bytes;
use futures::stream;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use frappe_sdk_client::response::DataEnvelope;
use frappe_sdk_client::{
    normalize, AppConfig, ClientConfig, FrappeClient, Result, TransportFailure,
};

use crate::types::{FileArgs, ProgressCallback, UploadFile};
use crate::{DEFAULT_UPLOAD_METHOD, UPLOAD_CHUNK_SIZE};

const UPLOAD_ERROR: &str = "There was an error while uploading the file.";

/// Client for uploading files.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use frappe_sdk_file::{FileArgs, FrappeFileUpload, UploadFile};
///
/// let uploader = FrappeFileUpload::new("https://erp.example.com")?;
/// let file = UploadFile::from_path("scan.pdf").await?;
///
/// let saved: serde_json::Value = uploader
///     .upload_file(
///         file,
///         &FileArgs::new().private(true).attach_to("ToDo", "TD-0001"),
///         Some(Arc::new(|sent, total| println!("{sent}/{total:?}"))),
///         None,
///     )
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct FrappeFileUpload {
    client: FrappeClient,
}

impl FrappeFileUpload {
    /// Create an upload client for the site at `url`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = FrappeClient::new(AppConfig::new(url))?;
        Ok(Self { client })
    }

    /// Create an upload client with explicit configuration.
    pub fn with_config(config: AppConfig, client_config: ClientConfig) -> Result<Self> {
        let client = FrappeClient::with_config(config, client_config)?;
        Ok(Self { client })
    }

    /// Create an upload client from an existing FrappeClient.
    pub fn from_client(client: FrappeClient) -> Self {
        Self { client }
    }

    /// Get the underlying FrappeClient.
    pub fn inner(&self) -> &FrappeClient {
        &self.client
    }

    /// Upload a file and return the saved `File` document.
    ///
    /// `api_path` is the whitelisted method receiving the form, relative to
    /// `/api/method/`; it defaults to `upload_file`. `on_progress` is called
    /// as each chunk of the file is handed to the transport.
    #[instrument(
        skip(self, file, args, on_progress),
        fields(file_name = %file.file_name, size = file.content.len())
    )]
    pub async fn upload_file<T: DeserializeOwned>(
        &self,
        file: UploadFile,
        args: &FileArgs,
        on_progress: Option<ProgressCallback>,
        api_path: Option<&str>,
    ) -> Result<T> {
        let form = build_form(file, args, on_progress)
            .map_err(|failure| normalize(failure, Some(UPLOAD_ERROR)))?;

        let path = format!(
            "/api/method/{}",
            api_path
                .unwrap_or(DEFAULT_UPLOAD_METHOD)
                .trim_start_matches('/')
        );

        let envelope: DataEnvelope<T> = self
            .client
            .post_multipart(&path, form, Some(UPLOAD_ERROR))
            .await?;
        Ok(envelope.data)
    }
}

fn build_form(
    file: UploadFile,
    args: &FileArgs,
    on_progress: Option<ProgressCallback>,
) -> std::result::Result<Form, TransportFailure> {
    let mime_type = file.mime_type();
    let total = file.len();
    let UploadFile {
        file_name, content, ..
    } = file;

    let part = Part::stream_with_length(progress_body(content, on_progress), total)
        .file_name(file_name)
        .mime_str(&mime_type)
        .map_err(|e| TransportFailure::Request(format!("Invalid MIME type {}: {}", mime_type, e)))?;

    let mut form = Form::new().part("file", part);
    for (name, value) in args.form_fields() {
        form = form.text(name, value);
    }
    Ok(form)
}

/// Stream `content` in chunks, reporting the running byte count as each
/// chunk is pulled by the transport.
fn progress_body(content: Bytes, on_progress: Option<ProgressCallback>) -> reqwest::Body {
    let total = content.len() as u64;
    let chunks: Vec<Bytes> = (0..content.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| content.slice(start..(start + UPLOAD_CHUNK_SIZE).min(content.len())))
        .collect();

    let mut sent = 0u64;
    let chunks = stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        if let Some(callback) = &on_progress {
            callback(sent, Some(total));
        }
        debug!(sent, total, "Upload chunk");
        Ok::<Bytes, std::io::Error>(chunk)
    }));

    reqwest::Body::wrap_stream(chunks)
}
