//! Local filesystem receipt storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::traits::storage::ReceiptStorage;

/// Stores receipt files under a root directory, one subdirectory per
/// namespace (the owning payment order).
#[derive(Debug, Clone)]
pub struct LocalReceiptStorage {
    /// Root directory for all stored receipts.
    root: PathBuf,
}

impl LocalReceiptStorage {
    /// Create a new receipt store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create receipt root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ReceiptStorage for LocalReceiptStorage {
    async fn save(&self, data: Bytes, filename: &str, namespace: &str) -> AppResult<String> {
        let safe_name = sanitize_filename(filename);
        let relative = format!("{namespace}/{}_{safe_name}", Uuid::new_v4());
        let full_path = self.resolve(&relative);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write receipt: {relative}"),
                e,
            )
        })?;

        debug!(path = %relative, bytes = data.len(), "Stored receipt");
        Ok(relative)
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.resolve(path).exists())
    }
}

/// Strip path separators and control characters from an uploaded filename.
fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();

    if name.is_empty() || name == "." || name == ".." {
        "receipt".to_string()
    } else {
        name
    }
}
