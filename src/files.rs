//! Files API client (evidence and report uploads, served from the files host).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    client::ClientInner,
    credentials::AuthorizationType,
    errors::{Error, Result, ValidationError},
    http::{impl_http_metadata_target, HttpMetadata},
    multipart::FileUploadRequest,
    types::Links,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileResponse {
    #[serde(skip)]
    pub http_metadata: HttpMetadata,
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub uploaded_on: Option<DateTime<Utc>>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

impl_http_metadata_target!(FileResponse);

#[derive(Clone)]
pub struct FilesClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl FilesClient {
    /// Upload a file as a multipart form (one file part plus a `purpose` field).
    pub async fn upload(&self, req: FileUploadRequest) -> Result<FileResponse> {
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let form = req.into_form().await?;
        self.inner.upload("/files", authorization, form).await
    }

    pub async fn get_file_details(&self, file_id: &str) -> Result<FileResponse> {
        if file_id.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("file id is required").with_field("file_id"),
            ));
        }
        let authorization = self
            .inner
            .authorization(AuthorizationType::SecretKeyOrOauth)?;
        let path = format!("/files/{file_id}");
        self.inner.get_files(&path, authorization).await
    }
}
