//! Error taxonomy for upload and delete operations

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// No file part was present in the request.
    #[error("No file uploaded")]
    NoFile,

    /// The declared content type is outside both allow-lists.
    #[error("Unsupported file type: {mime_type}")]
    UnsupportedType { mime_type: String },

    /// A single payload exceeded the size bound.
    #[error("File too large (max {max_mb} MB)")]
    FileTooLarge { max_mb: u64 },

    /// A batch exceeded the file-count bound.
    #[error("Too many files (max {max})")]
    TooManyFiles { max: usize },

    /// The delete target is not a plain file name.
    #[error("Invalid filename")]
    InvalidFilename,

    /// The delete target does not exist in any storage location.
    #[error("File not found")]
    NotFound,

    /// The multipart body could not be read.
    #[error("Malformed upload request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Unexpected filesystem or encoding failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UploadError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NoFile
            | Self::UnsupportedType { .. }
            | Self::FileTooLarge { .. }
            | Self::TooManyFiles { .. }
            | Self::InvalidFilename
            | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Validation rejections use the bare `{error}` envelope; everything
        // past validation reports `{success: false, error}`. Internal detail
        // stays in the server log.
        let body = match &self {
            Self::NoFile
            | Self::UnsupportedType { .. }
            | Self::FileTooLarge { .. }
            | Self::TooManyFiles { .. }
            | Self::InvalidFilename
            | Self::Multipart(_) => json!({ "error": self.to_string() }),
            Self::NotFound => json!({ "success": false, "error": self.to_string() }),
            Self::Internal(e) => {
                tracing::error!("Upload operation failed: {:#}", e);
                json!({ "success": false, "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
