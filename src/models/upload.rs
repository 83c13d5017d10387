use serde::Serialize;
use utoipa::ToSchema;

/// Record describing one stored upload, as returned to API clients.
///
/// Created at the end of a single ingress operation and never mutated
/// afterwards. When an image was normalized, `filename`, `path` and
/// `mimetype` describe the WebP file and `convertedToWebP` is true;
/// `size` always reports the payload as uploaded.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub original_name: String,
    pub filename: String,
    pub mimetype: String,
    pub size: u64,
    pub path: String,
    pub url: String,
    #[serde(rename = "convertedToWebP")]
    pub converted_to_webp: bool,
}
