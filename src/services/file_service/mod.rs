use crate::config::AppConfig;
use crate::entities::{prelude::*, *};
use crate::services::storage::StorageService;
use crate::utils::validation::StoredNameGenerator;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;

use crate::api::error::AppError;

pub mod delete;
pub mod upload;

/// Owns the uploaded-file collection and the files it references on disk
pub struct FileService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
    config: AppConfig,
    names: StoredNameGenerator,
}

impl FileService {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        Self {
            db,
            storage,
            config,
            names: StoredNameGenerator::new(),
        }
    }

    /// All file records, newest upload first
    pub async fn list_files(&self) -> Result<Vec<pdf_files::Model>, AppError> {
        let files = PdfFiles::find()
            .order_by_desc(pdf_files::Column::UploadDate)
            .order_by_desc(pdf_files::Column::Filename)
            .all(&self.db)
            .await?;
        Ok(files)
    }
}
