#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use learning_penguin::config::AppConfig;
use learning_penguin::infrastructure::{database, storage};
use learning_penguin::{AppState, create_app};
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

/// A router over a throwaway SQLite file and upload directory
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

pub async fn setup() -> TestApp {
    setup_with(|_| {}).await
}

/// Like [`setup`], with a chance to adjust the config before the app is built
pub async fn setup_with(adjust: impl FnOnce(&mut AppConfig)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let upload_dir = dir.path().join("uploads");
    // A file-backed database so every pooled connection sees the same tables
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

    let mut config = AppConfig::development(upload_dir.clone(), db_url);
    adjust(&mut config);
    let db = database::setup_database(&config.database_url).await.unwrap();
    let storage_service = storage::setup_storage(&config).await.unwrap();

    let state = AppState::new(db, storage_service, config);
    let app = create_app(state.clone());

    TestApp {
        app,
        state,
        upload_dir,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn upload(&self, field: &str, filename: &str, content: &str) -> Response<Body> {
        self.send(multipart_request(field, filename, content)).await
    }

    pub async fn get_json(&self, uri: &str) -> serde_json::Value {
        let response = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        body_json(response).await
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Names of the files currently in the upload directory
    pub fn stored_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.upload_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

pub fn multipart_request(field: &str, filename: &str, content: &str) -> Request<Body> {
    let multipart_body = format!(
        "--{boundary}\r\n\
        Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
        Content-Type: application/pdf\r\n\r\n\
        {content}\r\n\
        --{boundary}--\r\n",
        boundary = BOUNDARY,
    );

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body))
        .unwrap()
}

/// An upload whose only part carries no filename, i.e. a plain form value
pub fn text_field_request(field: &str, value: &str) -> Request<Body> {
    let multipart_body = format!(
        "--{boundary}\r\n\
        Content-Disposition: form-data; name=\"{field}\"\r\n\r\n\
        {value}\r\n\
        --{boundary}--\r\n",
        boundary = BOUNDARY,
    );

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
