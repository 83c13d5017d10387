//! Upload, batch-upload and delete endpoints
//!
//! The handlers own the transport-level bounds (per-file size, batch count)
//! so every violation is rejected with its own message before a single byte
//! reaches the filesystem; everything past that point belongs to the
//! ingestion service.

use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, post},
    Router,
};
use serde_json::json;
use tracing::debug;

use crate::auth::AuthUser;
use crate::ingestion::{error::UploadError, IngestFileRequest};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/upload-multiple", post(upload_files))
        .route("/{filename}", delete(delete_file))
}

/// Read one multipart field into an ingestion request, enforcing the
/// per-file size bound before anything is written.
async fn read_part(
    field: Field<'_>,
    max_file_size_bytes: u64,
    max_mb: u64,
) -> Result<IngestFileRequest, UploadError> {
    let original_name = field.file_name().unwrap_or("file").to_string();
    let declared_type = field.content_type().map(|mime| mime.to_string());
    let data = field.bytes().await?;

    if data.len() as u64 > max_file_size_bytes {
        return Err(UploadError::FileTooLarge { max_mb });
    }

    // Fall back to an extension guess when the client declared no type.
    let mime_type = declared_type.unwrap_or_else(|| {
        mime_guess::from_path(&original_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });

    Ok(IngestFileRequest {
        original_name,
        mime_type,
        data: data.to_vec(),
    })
}

#[utoipa::path(
    post,
    path = "/api/uploads/upload",
    tag = "uploads",
    responses(
        (status = 200, description = "File stored; images are re-encoded to WebP", body = crate::models::UploadedFile),
        (status = 400, description = "Missing file, unsupported type or oversized payload"),
        (status = 500, description = "Unexpected storage failure")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, UploadError> {
    let max_bytes = state.config.max_file_size_bytes();
    let max_mb = state.config.max_file_size_mb;

    let mut request = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            request = Some(read_part(field, max_bytes, max_mb).await?);
            break;
        }
    }
    let request = request.ok_or(UploadError::NoFile)?;

    debug!(
        "Single upload: {} ({}, {} bytes)",
        request.original_name,
        request.mime_type,
        request.data.len()
    );
    let file = state.ingestion.ingest_file(request).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "File uploaded successfully",
            "file": file,
        })),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/uploads/upload-multiple",
    tag = "uploads",
    responses(
        (status = 200, description = "Batch stored; the list reflects the files actually written"),
        (status = 400, description = "No files, unsupported type, oversized payload or too many files"),
        (status = 500, description = "Unexpected storage failure")
    )
)]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, UploadError> {
    let max_bytes = state.config.max_file_size_bytes();
    let max_mb = state.config.max_file_size_mb;
    let max_files = state.config.max_files_per_upload;

    let mut requests = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("files") {
            continue;
        }
        if requests.len() >= max_files {
            return Err(UploadError::TooManyFiles { max: max_files });
        }
        requests.push(read_part(field, max_bytes, max_mb).await?);
    }
    if requests.is_empty() {
        return Err(UploadError::NoFile);
    }

    debug!("Batch upload of {} files", requests.len());
    let files = state.ingestion.ingest_batch(requests).await?;
    let count = files.len();

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Files uploaded successfully",
            "files": files,
            "count": count,
        })),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/uploads/{filename}",
    tag = "uploads",
    params(
        ("filename" = String, Path, description = "Stored file name (not a path)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "File and any normalized sibling deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No stored file with that name"),
        (status = 500, description = "Unexpected storage failure")
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(filename): Path<String>,
) -> Result<Response, UploadError> {
    state.ingestion.delete_stored_file(&filename).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "File deleted successfully",
        })),
    )
        .into_response())
}
