use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncWriteExt};

pub struct UploadResult {
    /// Full path of the stored file
    pub path: String,
    pub size: i64,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Streams `reader` into a new file named `name` inside the storage root.
    async fn upload_stream<'a>(
        &self,
        name: &str,
        reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<UploadResult>;
    async fn delete_file(&self, path: &str) -> Result<()>;
    async fn file_exists(&self, path: &str) -> Result<bool>;
    /// Whether the backing location is present and usable
    async fn ready(&self) -> Result<bool>;
}

/// Stores uploads as plain files in a single directory
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the storage root if it does not exist yet
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating upload directory {}", self.root.display()))
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn upload_stream<'a>(
        &self,
        name: &str,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<UploadResult> {
        self.ensure_root().await?;

        let path = self.root.join(name);
        // create_new: never clobber an existing upload
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;

        let written = match tokio::io::copy(&mut reader, &mut file).await {
            Ok(n) => n,
            Err(e) => {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(
                        "Failed to remove partial upload {}: {}",
                        path.display(),
                        cleanup
                    );
                }
                return Err(anyhow::Error::new(e).context("writing upload to disk"));
            }
        };
        file.flush().await?;

        tracing::debug!("Stored {} bytes at {}", written, path.display());

        Ok(UploadResult {
            path: path.to_string_lossy().to_string(),
            size: written as i64,
        })
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        tokio::fs::remove_file(path)
            .await
            .with_context(|| format!("removing {}", path))
    }

    async fn file_exists(&self, path: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn ready(&self) -> Result<bool> {
        Ok(tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }
}
