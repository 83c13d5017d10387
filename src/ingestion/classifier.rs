//! MIME classification for incoming uploads
//!
//! Classification is a pure decision: the write step consumes the category,
//! and a rejected type never reaches the filesystem.

/// Image MIME types eligible for WebP normalization.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/tiff",
    "image/webp",
];

/// Document MIME types accepted into the files subtree.
pub const ALLOWED_DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/rtf",
    "text/plain",
    "text/csv",
];

/// Destination subtree for an accepted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Document,
}

/// Classify a declared MIME type against the allow-lists. `None` means the
/// type is not accepted and the ingress must fail before any bytes are
/// persisted.
pub fn classify(mime_type: &str) -> Option<FileCategory> {
    // Media type comparison ignores case and parameters such as charset.
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if ALLOWED_IMAGE_TYPES.contains(&essence.as_str()) {
        Some(FileCategory::Image)
    } else if ALLOWED_DOCUMENT_TYPES.contains(&essence.as_str()) {
        Some(FileCategory::Document)
    } else {
        None
    }
}
