//! Image validation and encoding for the AI service

use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use scentvalue_types::{EncodedImage, Error, Result};
use tracing::debug;

/// Supported image extensions
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// JPEG quality used when an image has to be re-encoded
const JPEG_QUALITY: u8 = 90;

/// Check if a path is a supported image file
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read an uploaded image file and encode it for transmission
pub fn load_upload(path: &Path) -> Result<EncodedImage> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a file",
            path.display()
        )));
    }

    if !is_supported_image(path) {
        return Err(Error::InvalidImageFormat(format!(
            "Unsupported image format: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    encode_for_transmission(&bytes)
}

/// Decode a `data:` URL (scheme prefix stripped) and encode it for transmission
pub fn load_data_url(data_url: &str) -> Result<EncodedImage> {
    let parsed = EncodedImage::from_data_url(data_url)
        .ok_or_else(|| Error::InvalidImageFormat("not a base64 data URL".to_string()))?;
    if !parsed.mime_type.starts_with("image/") {
        return Err(Error::InvalidImageFormat(format!(
            "data URL holds {}, not an image",
            parsed.mime_type
        )));
    }
    let bytes = STANDARD
        .decode(parsed.base64.as_bytes())
        .map_err(|e| Error::InvalidImageFormat(format!("bad base64 payload: {}", e)))?;
    encode_for_transmission(&bytes)
}

/// JPEG bytes pass through untouched; other formats are re-encoded to JPEG.
///
/// Either way the bytes must decode as an image.
pub fn encode_for_transmission(bytes: &[u8]) -> Result<EncodedImage> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory(bytes)?;

    if format == ImageFormat::Jpeg {
        debug!(bytes = bytes.len(), "jpeg passed through");
        return Ok(EncodedImage::jpeg(STANDARD.encode(bytes)));
    }

    let jpeg = to_jpeg(&decoded)?;
    debug!(from = ?format, bytes = jpeg.len(), "image re-encoded as jpeg");
    Ok(EncodedImage::jpeg(STANDARD.encode(&jpeg)))
}

fn to_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
    Ok(buffer.into_inner())
}
