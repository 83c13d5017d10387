/*!
 * Upload ingestion service
 *
 * Composes classification, stored-name allocation, persistence and WebP
 * normalization into the single-file, batch and delete operations exposed
 * over HTTP.
 */

pub mod classifier;
pub mod error;

use std::path::Path;

use tracing::{error, info, warn};

use crate::models::UploadedFile;
use crate::services::webp;
use crate::storage::LocalStorage;
use crate::utils::filename::allocate_stored_name;

use classifier::{classify, FileCategory};
use error::UploadError;

/// One payload handed over by the transport layer.
#[derive(Debug)]
pub struct IngestFileRequest {
    pub original_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FileIngestionService {
    storage: LocalStorage,
}

impl FileIngestionService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Ingest a single payload: classify, persist under an allocated name,
    /// normalize images to WebP (best effort), resolve the public URL.
    ///
    /// A failed normalization keeps the original file as the canonical asset;
    /// the upload still succeeds with `convertedToWebP == false`.
    pub async fn ingest_file(
        &self,
        request: IngestFileRequest,
    ) -> Result<UploadedFile, UploadError> {
        let category = classify(&request.mime_type).ok_or_else(|| UploadError::UnsupportedType {
            mime_type: request.mime_type.clone(),
        })?;

        let stored_name = allocate_stored_name(&request.original_name);
        let size = request.data.len() as u64;
        let stored_path = self
            .storage
            .write_file(category, &stored_name, &request.data)
            .await?;

        let mut uploaded = UploadedFile {
            original_name: request.original_name,
            filename: stored_name,
            mimetype: request.mime_type,
            size,
            path: stored_path.to_string_lossy().to_string(),
            url: String::new(),
            converted_to_webp: false,
        };

        // A stored .webp is already in canonical format; re-encoding would
        // overwrite the source in place.
        if category == FileCategory::Image && !webp::is_webp_path(&stored_path) {
            match webp::normalize_to_webp(&stored_path).await {
                Ok(webp_path) => {
                    if let Some(name) = webp_path.file_name() {
                        uploaded.filename = name.to_string_lossy().to_string();
                    }
                    uploaded.path = webp_path.to_string_lossy().to_string();
                    uploaded.mimetype = "image/webp".to_string();
                    uploaded.converted_to_webp = true;
                }
                Err(e) => {
                    warn!(
                        "WebP normalization failed for {}, keeping original: {:#}",
                        uploaded.filename, e
                    );
                }
            }
        }

        uploaded.url = self.storage.to_public_url(Path::new(&uploaded.path))?;

        info!(
            "Ingested {} as {} ({} bytes)",
            uploaded.original_name, uploaded.filename, uploaded.size
        );
        Ok(uploaded)
    }

    /// Ingest an ordered batch.
    ///
    /// Every payload is classified before the first write, so an unsupported
    /// type rejects the whole batch with nothing on disk. After validation
    /// the files are independent: a failed file is logged and skipped, and
    /// the returned list is what was actually written. There is no rollback.
    pub async fn ingest_batch(
        &self,
        requests: Vec<IngestFileRequest>,
    ) -> Result<Vec<UploadedFile>, UploadError> {
        for request in &requests {
            if classify(&request.mime_type).is_none() {
                return Err(UploadError::UnsupportedType {
                    mime_type: request.mime_type.clone(),
                });
            }
        }

        let mut uploaded = Vec::with_capacity(requests.len());
        for request in requests {
            let original_name = request.original_name.clone();
            match self.ingest_file(request).await {
                Ok(file) => uploaded.push(file),
                Err(e) => error!("Skipping {} after ingestion failure: {}", original_name, e),
            }
        }
        Ok(uploaded)
    }

    /// Delete a stored file by name, plus its normalized sibling if present.
    pub async fn delete_stored_file(&self, stored_name: &str) -> Result<(), UploadError> {
        if !is_plain_file_name(stored_name) {
            return Err(UploadError::InvalidFilename);
        }

        if self.storage.delete_stored(stored_name).await? {
            Ok(())
        } else {
            Err(UploadError::NotFound)
        }
    }
}

/// A delete target must be a bare file name: no separators, no traversal,
/// no control characters.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.chars().any(|c| c.is_control())
}
