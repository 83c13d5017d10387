//! Local filesystem layout and file operations for the uploads tree

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{error, info};

use crate::ingestion::classifier::FileCategory;

/// Public mount under which the uploads root is served over HTTP.
pub const PUBLIC_MOUNT: &str = "/uploads";

pub const IMAGES_SUBDIR: &str = "images";
pub const FILES_SUBDIR: &str = "files";

/// Uploads root plus derived subdirectory paths. Constructed once at startup
/// and shared by reference through the application state.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(upload_path: impl Into<PathBuf>) -> Self {
        Self {
            root: upload_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_SUBDIR)
    }

    pub fn files_dir(&self) -> PathBuf {
        self.root.join(FILES_SUBDIR)
    }

    fn category_dir(&self, category: FileCategory) -> PathBuf {
        match category {
            FileCategory::Image => self.images_dir(),
            FileCategory::Document => self.files_dir(),
        }
    }

    /// Create the uploads root and its subdirectories. Idempotent; a failure
    /// here is unrecoverable and should abort startup.
    pub async fn initialize(&self) -> Result<()> {
        for dir in [self.root.clone(), self.images_dir(), self.files_dir()] {
            if let Err(e) = fs::create_dir_all(&dir).await {
                error!("Failed to create directory {:?}: {}", dir, e);
                return Err(anyhow::anyhow!("Failed to create storage layout: {}", e));
            }
            info!("Ensured directory exists: {:?}", dir);
        }
        Ok(())
    }

    /// Write an uploaded payload under the subtree for its category and
    /// return the absolute stored path.
    pub async fn write_file(
        &self,
        category: FileCategory,
        stored_name: &str,
        data: &[u8],
    ) -> Result<PathBuf> {
        let dir = self.category_dir(category);
        fs::create_dir_all(&dir).await?;

        let path = dir.join(stored_name);
        fs::write(&path, data).await?;

        info!("Stored upload locally: {}", path.display());
        Ok(path)
    }

    /// Delete a stored file by name, probing the root and both subtrees in a
    /// fixed order. A sibling `.webp` with the same stem is removed as well.
    /// Returns false when no location holds the file.
    pub async fn delete_stored(&self, stored_name: &str) -> Result<bool> {
        let candidates = [
            self.root.join(stored_name),
            self.images_dir().join(stored_name),
            self.files_dir().join(stored_name),
        ];

        for path in &candidates {
            match fs::remove_file(path).await {
                Ok(()) => {
                    info!("Deleted file: {}", path.display());
                    self.delete_webp_sibling(path).await?;
                    return Ok(true);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    error!("Failed to delete file {}: {}", path.display(), e);
                    return Err(anyhow::anyhow!(
                        "Failed to delete file {}: {}",
                        path.display(),
                        e
                    ));
                }
            }
        }

        Ok(false)
    }

    async fn delete_webp_sibling(&self, path: &Path) -> Result<()> {
        let sibling = path.with_extension("webp");
        if sibling == path {
            return Ok(());
        }

        match fs::remove_file(&sibling).await {
            Ok(()) => {
                info!("Deleted normalized sibling: {}", sibling.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to delete sibling {}: {}",
                sibling.display(),
                e
            )),
        }
    }

    /// Map an absolute stored path back to its root-relative public URL,
    /// forward-slash joined regardless of platform.
    ///
    /// A path outside the uploads root is an invariant violation, not a
    /// user-facing error.
    pub fn to_public_url(&self, absolute: &Path) -> Result<String> {
        let relative = absolute.strip_prefix(&self.root).with_context(|| {
            format!(
                "path {} is not under the uploads root {}",
                absolute.display(),
                self.root.display()
            )
        })?;

        let mut url = String::from(PUBLIC_MOUNT);
        for component in relative.components() {
            url.push('/');
            url.push_str(&component.as_os_str().to_string_lossy());
        }
        Ok(url)
    }
}
