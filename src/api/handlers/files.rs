use crate::AppState;
use crate::api::error::AppError;
use crate::entities::pdf_files;
use crate::models::{ClearReport, FileRecord};
use crate::services::file_service::upload::too_large;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    extract::multipart::MultipartError,
    http::StatusCode,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "pdfFile";

#[utoipa::path(
    get,
    path = "/pdfs",
    responses(
        (status = 200, description = "Uploaded files, newest first", body = Vec<FileRecord>),
        (status = 500, description = "Store failure")
    ),
    tag = "files"
)]
pub async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<FileRecord>>, AppError> {
    let files = state.file_service.list_files().await?;
    Ok(Json(files.into_iter().map(FileRecord::from).collect()))
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Multipart, description = "Single PDF under the `pdfFile` field"),
    responses(
        (status = 200, description = "File uploaded", body = String),
        (status = 400, description = "No file, or disallowed extension"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Store or filesystem failure")
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, AppError> {
    // Use a result to capture errors so we can consume the multipart stream if needed
    let result: Result<String, AppError> = async {
        let mut stored: Option<pdf_files::Model> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            let wanted = name == UPLOAD_FIELD && stored.is_none();
            // A part without a filename is a plain form value, not a file
            let file_name = field.file_name().map(|s| s.to_string());

            if let Some(original_name) = file_name.filter(|_| wanted) {
                let content_type = field.content_type().map(|s| s.to_string());

                let reader = StreamReader::new(field.map_err(std::io::Error::other));
                stored = Some(
                    state
                        .file_service
                        .ingest(&original_name, content_type.as_deref(), reader)
                        .await?,
                );
            } else {
                tracing::debug!("Ignoring multipart field '{}'", name);
                let mut field = field;
                while field.chunk().await.map_err(multipart_error)?.is_some() {}
            }
        }

        let record = stored.ok_or_else(|| AppError::BadRequest("No file uploaded.".to_string()))?;
        Ok(format!("File uploaded successfully: {}", record.filename))
    }
    .await;

    match result {
        Ok(res) => Ok(res),
        Err(e) => {
            // Drain the rest of the body so the client sees our response instead of a reset
            tracing::warn!("Upload failed early: {}. Consuming remaining stream...", e);
            while let Ok(Some(mut field)) = multipart.next_field().await {
                while let Ok(Some(_)) = field.chunk().await {}
            }
            Err(e)
        }
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => too_large(),
        status if status.is_client_error() => AppError::BadRequest(e.body_text()),
        _ => AppError::Internal(format!("Failed to read multipart body: {}", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/pdfs/clear",
    responses(
        (status = 200, description = "All records removed; per-file unlink outcome", body = ClearReport),
        (status = 500, description = "Store failure")
    ),
    tag = "files"
)]
pub async fn clear_files(State(state): State<AppState>) -> Result<Json<ClearReport>, AppError> {
    let report = state.file_service.clear_all().await?;
    Ok(Json(report))
}

#[utoipa::path(
    delete,
    path = "/pdfs/{id}/delete",
    params(
        ("id" = String, Path, description = "File record ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = String),
        (status = 404, description = "File not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "files"
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, AppError> {
    state.file_service.delete_file(&id).await?;
    Ok("PDF file deleted successfully")
}
