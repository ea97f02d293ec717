use crate::models::{ClearReport, Event, EventPatch, FileRecord, NewEvent};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::path::Path;

use super::error::ClientError;

/// Multipart field name expected by `POST /upload`
pub const UPLOAD_FIELD: &str = "pdfFile";

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// A file picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn pdf(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::new(file_name, mime::APPLICATION_PDF.as_ref(), bytes)
    }

    /// Reads a file from disk, guessing the media type from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let is_pdf = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        let content_type = if is_pdf {
            mime::APPLICATION_PDF
        } else {
            mime::APPLICATION_OCTET_STREAM
        };
        Ok(Self::new(file_name, content_type.as_ref(), bytes))
    }
}

/// The REST surface of the backend as seen by the client controllers
#[async_trait]
pub trait StudyApi: Send + Sync {
    async fn list_files(&self) -> Result<Vec<FileRecord>, ClientError>;
    async fn upload_file(&self, file: &UploadFile) -> Result<String, ClientError>;
    async fn delete_file(&self, id: &str) -> Result<String, ClientError>;
    async fn clear_files(&self) -> Result<ClearReport, ClientError>;
    async fn list_events(&self) -> Result<Vec<Event>, ClientError>;
    async fn create_event(&self, event: &NewEvent) -> Result<Event, ClientError>;
    async fn update_event(&self, id: &str, patch: &EventPatch) -> Result<Event, ClientError>;
    async fn delete_event(&self, id: &str) -> Result<String, ClientError>;
}

/// `StudyApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Base URL from `API_URL`, falling back to the local backend
    pub fn from_env() -> Self {
        let base_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Passes success responses through and turns everything else into `ClientError::Http`
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Http {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl StudyApi for HttpApiClient {
    async fn list_files(&self) -> Result<Vec<FileRecord>, ClientError> {
        let response = self.http.get(self.url("/pdfs")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn upload_file(&self, file: &UploadFile) -> Result<String, ClientError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        Ok(check(response).await?.text().await?)
    }

    async fn delete_file(&self, id: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/pdfs/{}/delete", id)))
            .send()
            .await?;
        Ok(check(response).await?.text().await?)
    }

    async fn clear_files(&self) -> Result<ClearReport, ClientError> {
        let response = self.http.delete(self.url("/pdfs/clear")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn list_events(&self) -> Result<Vec<Event>, ClientError> {
        let response = self.http.get(self.url("/events")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event, ClientError> {
        let response = self
            .http
            .post(self.url("/events"))
            .json(event)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update_event(&self, id: &str, patch: &EventPatch) -> Result<Event, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/events/{}", id)))
            .json(patch)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete_event(&self, id: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/events/{}", id)))
            .send()
            .await?;
        Ok(check(response).await?.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = HttpApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/pdfs"), "http://localhost:3000/pdfs");
    }

    #[tokio::test]
    async fn test_upload_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Week1.PDF");
        tokio::fs::write(&path, b"%PDF-1.7").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "Week1.PDF");
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.bytes.as_ref(), b"%PDF-1.7");
    }
}
