use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine};
use std::fs;
use std::path::Path;

use crate::models::PickedImage;

/// Reads an image file from disk and hands it over the same way a gallery pick would
pub fn pick_from_path(path: &Path) -> Result<PickedImage> {
    log::debug!("📸 Reading image: {}", path.display());

    let image_data = fs::read(path)
        .with_context(|| format!("Failed to read image file {}", path.display()))?;

    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false);
    if !is_jpeg {
        log::warn!("⚠️ {} is not a .jpg file, sending it as image/jpeg anyway", path.display());
    }

    let base64 = general_purpose::STANDARD.encode(&image_data);
    log::debug!("📊 Image file size: {} bytes", image_data.len());

    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    Ok(PickedImage {
        cancelled: false,
        uri: format!("file://{}", absolute.display()),
        base64,
    })
}
