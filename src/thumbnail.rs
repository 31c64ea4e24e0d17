//! Thumbnail derivation for uploaded images.
//!
//! Decodes an uploaded payload, clamps the width to a fixed maximum while
//! preserving aspect ratio, and re-encodes as JPEG. Decoding and resizing
//! are CPU-bound, so the async entry point runs them on a blocking thread.

use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::error::GalleryError;

/// Maximum thumbnail width in pixels. Height scales with the aspect ratio.
pub const MAX_THUMBNAIL_WIDTH: u32 = 150;

/// Derive a thumbnail from an uploaded image payload.
///
/// Runs on a blocking thread; errors are stringified for the message
/// boundary.
pub async fn derive(blob: Vec<u8>) -> Result<Vec<u8>, String> {
    tokio::task::spawn_blocking(move || derive_blocking(&blob).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Decode, clamp and re-encode synchronously.
///
/// Payloads that are not a decodable image fail with
/// [`GalleryError::UnsupportedFormat`]; the caller skips that file and
/// continues the batch.
pub fn derive_blocking(blob: &[u8]) -> Result<Vec<u8>, GalleryError> {
    let decoded = image::load_from_memory(blob)
        .map_err(|err| GalleryError::UnsupportedFormat(err.to_string()))?;

    let scaled = if decoded.width() > MAX_THUMBNAIL_WIDTH {
        let height = ((decoded.height() as f64 * MAX_THUMBNAIL_WIDTH as f64
            / decoded.width() as f64)
            .round() as u32)
            .max(1);
        decoded.resize_exact(MAX_THUMBNAIL_WIDTH, height, FilterType::Lanczos3)
    } else {
        // Never upscale small images
        decoded
    };

    // JPEG has no alpha channel, so flatten to RGB before encoding
    let flattened = DynamicImage::ImageRgb8(scaled.to_rgb8());

    let mut buffer = Vec::new();
    flattened
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .map_err(|err| GalleryError::UnsupportedFormat(err.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([80, 120, 40])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_wide_image_is_clamped_preserving_aspect() {
        let thumbnail = derive_blocking(&png_bytes(300, 200)).unwrap();

        let decoded = image::load_from_memory(&thumbnail).unwrap();
        assert_eq!(decoded.width(), 150);
        assert_eq!(decoded.height(), 100);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let thumbnail = derive_blocking(&png_bytes(80, 60)).unwrap();

        let decoded = image::load_from_memory(&thumbnail).unwrap();
        assert_eq!(decoded.width(), 80);
        assert_eq!(decoded.height(), 60);
    }

    #[test]
    fn test_output_is_jpeg() {
        let thumbnail = derive_blocking(&png_bytes(200, 200)).unwrap();
        assert_eq!(
            image::guess_format(&thumbnail).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_alpha_images_are_flattened() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            400,
            100,
            Rgba([200, 10, 10, 128]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let thumbnail = derive_blocking(&bytes).unwrap();
        let decoded = image::load_from_memory(&thumbnail).unwrap();
        assert_eq!(decoded.width(), 150);
        assert_eq!(decoded.height(), 25);
    }

    #[test]
    fn test_undecodable_payload_is_unsupported() {
        let result = derive_blocking(b"this is not an image at all");
        assert!(matches!(result, Err(GalleryError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_async_derive_reports_errors_as_strings() {
        let result = derive(b"garbage".to_vec()).await;
        assert!(result.unwrap_err().contains("not a supported image format"));
    }
}
