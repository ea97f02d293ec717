use crate::api::error::AppError;
use crate::entities::pdf_files;
use crate::utils::validation::{sanitize_filename, validate_extension};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

use super::FileService;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

impl FileService {
    /// Validates, stores and records one uploaded file.
    ///
    /// The extension is checked before anything touches the disk. Bytes are
    /// written first and the metadata record second; if the record cannot be
    /// inserted the written file is removed again.
    pub async fn ingest<'a>(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        reader: impl AsyncRead + Unpin + Send + 'a,
    ) -> Result<pdf_files::Model, AppError> {
        validate_extension(original_name, &self.config.allowed_extension)?;
        let base_name = sanitize_filename(original_name)?;

        let stored_name = self.names.stored_name(&base_name);

        // One byte past the cap is enough to tell an oversized upload apart
        let limit = self.config.max_file_size as u64;
        let reader = reader.take(limit + 1);

        let stored = self
            .storage
            .upload_stream(&stored_name, Box::new(reader))
            .await
            .map_err(|e| {
                if exceeds_body_limit(&e) {
                    too_large()
                } else {
                    AppError::Anyhow(e.context("Failed to store upload"))
                }
            })?;

        if stored.size as u64 > limit {
            tracing::warn!(
                "🚫 Upload '{}' exceeds the {} byte limit",
                original_name,
                limit
            );
            if let Err(cleanup) = self.storage.delete_file(&stored.path).await {
                tracing::warn!(
                    "Failed to remove oversized upload {}: {:#}",
                    stored.path,
                    cleanup
                );
            }
            return Err(too_large());
        }

        tracing::info!(
            "📄 Stored upload '{}' as {} ({} bytes)",
            original_name,
            stored.path,
            stored.size
        );

        let record = pdf_files::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            filename: Set(stored_name),
            original_name: Set(original_name.to_string()),
            path: Set(stored.path.clone()),
            size: Set(stored.size),
            mime_type: Set(content_type
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_MIME_TYPE)
                .to_string()),
            upload_date: Set(Utc::now()),
        };

        match record.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(e) => {
                tracing::error!("Error saving file metadata: {:?}", e);
                if let Err(cleanup) = self.storage.delete_file(&stored.path).await {
                    tracing::warn!(
                        "Failed to remove orphaned upload {}: {:#}",
                        stored.path,
                        cleanup
                    );
                }
                Err(AppError::Database(e))
            }
        }
    }
}

pub(crate) fn too_large() -> AppError {
    AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
}

/// Whether a storage failure was caused by the request body hitting its
/// size limit while the upload was being streamed.
fn exceeds_body_limit(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .and_then(|io| io.get_ref())
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
            .is_some_and(|m| m.status() == StatusCode::PAYLOAD_TOO_LARGE)
    })
}
