use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::models::{ClearReport, UnlinkResult};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter};

use super::FileService;

/// Records removed per `DELETE ... WHERE id IN (...)` during a clear
pub const CLEAR_BATCH_SIZE: usize = 500;

impl FileService {
    /// Removes one file record and, best effort, the file it points to.
    pub async fn delete_file(&self, id: &str) -> Result<pdf_files::Model, AppError> {
        let item = PdfFiles::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("PDF file not found".to_string()))?;

        if let Err(e) = self.storage.delete_file(&item.path).await {
            tracing::error!("Error deleting file from filesystem: {:#}", e);
        }

        item.clone().delete(&self.db).await?;
        tracing::info!("🗑️  Deleted file record {} ({})", item.id, item.original_name);

        Ok(item)
    }

    /// Removes every file record and tries to unlink every referenced file.
    ///
    /// Unlink failures do not stop the batch; each one is reported per item.
    pub async fn clear_all(&self) -> Result<ClearReport, AppError> {
        let items = PdfFiles::find().all(&self.db).await?;

        let mut files = Vec::with_capacity(items.len());
        let mut removed = 0;

        // Batches keep each IN (...) under the backend's bound-parameter limit,
        // and a failing batch leaves earlier ones fully cleared.
        for batch in items.chunks(CLEAR_BATCH_SIZE) {
            for item in batch {
                let outcome = self.storage.delete_file(&item.path).await;
                if let Err(ref e) = outcome {
                    tracing::error!("Error deleting file {}: {:#}", item.path, e);
                }
                files.push(UnlinkResult {
                    id: item.id.clone(),
                    path: item.path.clone(),
                    unlinked: outcome.is_ok(),
                    error: outcome.err().map(|e| format!("{:#}", e)),
                });
            }

            // Only the records loaded above; uploads landing mid-clear survive
            let ids = batch.iter().map(|i| i.id.clone());
            let res = PdfFiles::delete_many()
                .filter(pdf_files::Column::Id.is_in(ids))
                .exec(&self.db)
                .await?;
            removed += res.rows_affected;
        }

        let report = ClearReport { removed, files };
        tracing::info!(
            "🧹 Cleared {} file records ({} unlink failures)",
            report.removed,
            report.failed().count()
        );

        Ok(report)
    }
}
