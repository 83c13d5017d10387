use std::io::Cursor;
use std::path::Path;

use stashr::ingestion::error::UploadError;
use stashr::ingestion::{FileIngestionService, IngestFileRequest};
use stashr::storage::LocalStorage;
use tempfile::TempDir;

async fn service(dir: &TempDir) -> FileIngestionService {
    let storage = LocalStorage::new(dir.path().join("uploads"));
    storage.initialize().await.expect("storage layout should initialize");
    FileIngestionService::new(storage)
}

fn png_payload() -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(8, 8, image::Rgba([120, 40, 200, 255]));
    let mut cursor = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .expect("in-memory PNG should encode");
    cursor.into_inner()
}

fn request(name: &str, mime: &str, data: Vec<u8>) -> IngestFileRequest {
    IngestFileRequest {
        original_name: name.to_string(),
        mime_type: mime.to_string(),
        data,
    }
}

fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += count_files(&path);
            } else {
                count += 1;
            }
        }
    }
    count
}

#[tokio::test]
async fn test_image_ingress_normalizes_to_webp() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;
    let payload = png_payload();
    let payload_len = payload.len() as u64;

    let file = service
        .ingest_file(request("My Photo.PNG", "image/png", payload))
        .await
        .expect("image ingress should succeed");

    assert!(file.converted_to_webp);
    assert_eq!(file.mimetype, "image/webp");
    assert!(file.filename.ends_with(".webp"));
    assert!(file.url.starts_with("/uploads/images/"));
    assert_eq!(file.size, payload_len);

    // Exactly one file remains for the asset: the normalized one.
    assert_eq!(count_files(&service.storage().images_dir()), 1);
    assert!(Path::new(&file.path).exists());
}

#[tokio::test]
async fn test_document_ingress_lands_in_files_subtree() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    let file = service
        .ingest_file(request("notes.txt", "text/plain", b"meeting notes".to_vec()))
        .await
        .expect("document ingress should succeed");

    assert!(!file.converted_to_webp);
    assert_eq!(file.mimetype, "text/plain");
    assert!(file.url.starts_with("/uploads/files/"));
    assert_eq!(count_files(&service.storage().files_dir()), 1);
}

#[tokio::test]
async fn test_unsupported_type_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    let result = service
        .ingest_file(request("archive.zip", "application/zip", b"PK..".to_vec()))
        .await;

    assert!(matches!(result, Err(UploadError::UnsupportedType { .. })));
    assert_eq!(count_files(service.storage().root()), 0);
}

#[tokio::test]
async fn test_corrupt_image_keeps_original_and_succeeds() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    let file = service
        .ingest_file(request("broken.png", "image/png", b"not really a png".to_vec()))
        .await
        .expect("a failed normalization must not fail the upload");

    assert!(!file.converted_to_webp);
    assert_eq!(file.mimetype, "image/png");
    assert!(file.filename.ends_with(".png"));
    assert!(file.url.starts_with("/uploads/images/"));

    // The original is the canonical asset; no .webp sibling was left behind.
    assert_eq!(count_files(&service.storage().images_dir()), 1);
    assert!(Path::new(&file.path).exists());
}

#[tokio::test]
async fn test_webp_upload_is_stored_without_reencoding() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    let file = service
        .ingest_file(request("sticker.webp", "image/webp", b"RIFFxxxxWEBP".to_vec()))
        .await
        .expect("webp ingress should succeed");

    assert!(!file.converted_to_webp);
    assert_eq!(file.mimetype, "image/webp");
    assert_eq!(count_files(&service.storage().images_dir()), 1);
}

#[tokio::test]
async fn test_batch_preserves_order_and_mixes_categories() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    let files = service
        .ingest_batch(vec![
            request("cover.png", "image/png", png_payload()),
            request("summary.txt", "text/plain", b"summary".to_vec()),
        ])
        .await
        .expect("batch ingress should succeed");

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].original_name, "cover.png");
    assert!(files[0].converted_to_webp);
    assert_eq!(files[1].original_name, "summary.txt");
    assert!(files[1].url.starts_with("/uploads/files/"));
}

#[tokio::test]
async fn test_batch_with_unsupported_type_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    let result = service
        .ingest_batch(vec![
            request("cover.png", "image/png", png_payload()),
            request("movie.mp4", "video/mp4", b"mpeg".to_vec()),
        ])
        .await;

    assert!(matches!(result, Err(UploadError::UnsupportedType { .. })));
    assert_eq!(count_files(service.storage().root()), 0);
}

#[tokio::test]
async fn test_delete_round_trip() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    let file = service
        .ingest_file(request("report.txt", "text/plain", b"quarterly".to_vec()))
        .await
        .unwrap();

    service
        .delete_stored_file(&file.filename)
        .await
        .expect("delete of a stored file should succeed");
    assert_eq!(count_files(service.storage().root()), 0);

    let result = service.delete_stored_file(&file.filename).await;
    assert!(matches!(result, Err(UploadError::NotFound)));
}

#[tokio::test]
async fn test_delete_of_normalized_image_removes_the_webp() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    let file = service
        .ingest_file(request("banner.png", "image/png", png_payload()))
        .await
        .unwrap();
    assert!(file.filename.ends_with(".webp"));

    service.delete_stored_file(&file.filename).await.unwrap();
    assert_eq!(count_files(service.storage().root()), 0);
}

#[tokio::test]
async fn test_delete_rejects_path_like_names() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    for name in ["../escape.txt", "images/photo.png", ""] {
        let result = service.delete_stored_file(name).await;
        assert!(matches!(result, Err(UploadError::InvalidFilename)), "{name}");
    }
}
