//! WebP normalization for stored images
//!
//! Re-encodes an image on disk into the canonical lossy format. On success
//! the original file is gone and only the `.webp` sibling remains; on
//! failure the original is untouched and the caller keeps serving it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Quality level for lossy WebP re-encoding.
pub const WEBP_QUALITY: f32 = 80.0;

/// Whether a stored path already carries the canonical WebP extension.
pub fn is_webp_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("webp"))
        .unwrap_or(false)
}

/// Re-encode the image at `source` into lossy WebP at the sibling `.webp`
/// path and remove the original.
pub async fn normalize_to_webp(source: &Path) -> Result<PathBuf> {
    let source = source.to_path_buf();
    let output = source.with_extension("webp");
    if output == source {
        anyhow::bail!("{} is already a .webp path", source.display());
    }

    let encoded = tokio::task::spawn_blocking({
        let source = source.clone();
        move || encode_webp(&source)
    })
    .await
    .context("WebP encoding task panicked")??;

    tokio::fs::write(&output, &encoded)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    // Exactly one file may remain per asset. If the original cannot be
    // removed, take the freshly written sibling back out.
    if let Err(e) = tokio::fs::remove_file(&source).await {
        let _ = tokio::fs::remove_file(&output).await;
        return Err(e).with_context(|| {
            format!(
                "failed to remove pre-normalization file {}",
                source.display()
            )
        });
    }

    info!("Normalized {} -> {}", source.display(), output.display());
    Ok(output)
}

/// Decode and lossy-encode on the current thread; both steps are CPU-bound
/// and run under `spawn_blocking` from the async path.
fn encode_webp(source: &Path) -> Result<Vec<u8>> {
    let image = image::ImageReader::open(source)
        .with_context(|| format!("failed to open {}", source.display()))?
        .with_guessed_format()
        .with_context(|| format!("failed to probe image format of {}", source.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", source.display()))?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let encoded = webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode(WEBP_QUALITY);
    Ok(encoded.to_vec())
}
