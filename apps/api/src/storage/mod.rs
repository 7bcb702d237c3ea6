//! Artifact storage capability.
//!
//! The core operations never touch filesystem paths directly — they hold an
//! injected `BlobStore` (put/get/list by name), so the flat-file backend can
//! be swapped for object storage without touching composition logic.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;

/// A flat key-value blob store. Names are opaque, entries are write-once.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `name` in a single write, so a failed request
    /// never leaves a partial artifact visible.
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), AppError>;

    /// Fetches an entry. `None` means the name has no artifact.
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Enumerates all stored names. Existence in the store is the only record.
    async fn list(&self) -> Result<Vec<String>, AppError>;
}

/// Filesystem-backed store over a single flat directory.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens the store, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!("Artifact store ready at {}", root.display());
        Ok(Self { root })
    }

    /// Maps a name to its path. The store is flat: names carrying path
    /// separators or parent components are rejected outright.
    fn entry_path(&self, name: &str) -> Result<PathBuf, AppError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(AppError::Validation(format!(
                "invalid artifact name '{name}'"
            )));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for FsStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.entry_path(name)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.entry_path(name)?;
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
