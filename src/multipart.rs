//! Multipart form construction for file uploads.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};

use crate::errors::{Error, Result, TransportError, TransportErrorKind, ValidationError};

/// A file to upload together with its declared purpose
/// (e.g. `dispute_evidence`).
#[derive(Debug, Clone)]
pub struct FileUploadRequest {
    pub file: PathBuf,
    pub purpose: String,
}

impl FileUploadRequest {
    pub fn new(file: impl Into<PathBuf>, purpose: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            purpose: purpose.into(),
        }
    }

    /// Fails fast before any file I/O or network activity.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.file.as_os_str().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("file path is required").with_field("file"),
            ));
        }
        if self.purpose.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new("purpose is required").with_field("purpose"),
            ));
        }
        Ok(())
    }

    pub(crate) async fn into_form(self) -> Result<Form> {
        self.validate()?;
        let bytes = tokio::fs::read(&self.file).await.map_err(|err| {
            Error::Transport(TransportError {
                kind: TransportErrorKind::Request,
                message: format!("failed to read {}: {err}", self.file.display()),
                source: None,
            })
        })?;
        build_form(&self.file, bytes, self.purpose)
    }
}

fn build_form(path: &Path, bytes: Vec<u8>, purpose: String) -> Result<Form> {
    let part = Part::bytes(bytes)
        .file_name(file_name_of(path))
        .mime_str(content_type_for(path))
        .map_err(|err| Error::Configuration(format!("invalid content type: {err}")))?;
    Ok(Form::new().part("file", part).text("purpose", purpose))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}

/// Content type detected from the file extension; the gateway accepts
/// PDF, JPEG, PNG and CSV evidence files.
fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_path_fails_validation() {
        let err = FileUploadRequest::new("", "dispute_evidence")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn empty_purpose_fails_validation() {
        let err = FileUploadRequest::new("receipt.pdf", "  ")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn content_type_detected_from_extension() {
        assert_eq!(content_type_for(Path::new("a/receipt.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("report.csv")), "text/csv");
        assert_eq!(
            content_type_for(Path::new("unknown.bin")),
            "application/octet-stream"
        );
    }
}
