use crate::config::AppConfig;
use crate::services::storage::LocalStorageService;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> anyhow::Result<Arc<LocalStorageService>> {
    let storage = LocalStorageService::new(config.upload_dir.clone());

    info!("🗄️  Upload directory: {}", storage.root().display());
    storage.ensure_root().await?;

    Ok(Arc::new(storage))
}
