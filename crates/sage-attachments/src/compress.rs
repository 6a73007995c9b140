//! Image downscale and re-encode.
//!
//! Keeps attachments from inflating request cost: anything larger than the
//! bounding box is scaled down (aspect preserved, never upscaled) and
//! re-encoded as JPEG at a fixed quality. The ~1 MiB output target is a
//! best-effort quality setting, not an iterative size search.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::trace;

use crate::error::AttachmentError;

/// Bounding box edge for compressed images (1200×1200).
pub const MAX_DIMENSION: u32 = 1200;

/// JPEG re-encode quality (0–100).
pub const JPEG_QUALITY: u8 = 80;

/// Soft output budget the quality setting aims for.
pub const TARGET_OUTPUT_BYTES: usize = 1024 * 1024;

/// Compute output dimensions that fit [`MAX_DIMENSION`]² preserving aspect
/// ratio. Images already inside the box keep their original dimensions;
/// this never upscales.
#[must_use]
pub fn target_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return (width, height);
    }

    let scale = (f64::from(MAX_DIMENSION) / f64::from(width))
        .min(f64::from(MAX_DIMENSION) / f64::from(height));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = |dim: u32| ((f64::from(dim) * scale).round() as u32).clamp(1, MAX_DIMENSION);
    (scaled(width), scaled(height))
}

/// Decode, downscale, and re-encode an image as JPEG.
///
/// Synchronous core; use [`compress`] from async contexts.
pub fn compress_image(bytes: &[u8]) -> Result<Vec<u8>, AttachmentError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AttachmentError::Decode(e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    let (target_w, target_h) = target_dimensions(width, height);

    let resized = if (target_w, target_h) == (width, height) {
        img
    } else {
        img.resize_exact(target_w, target_h, FilterType::Triangle)
    };

    // JPEG carries no alpha channel
    let rgb = resized.to_rgb8();

    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(
        Cursor::new(&mut out),
        JPEG_QUALITY,
    ))
    .map_err(|e| AttachmentError::Decode(e.to_string()))?;

    trace!(
        original = format!("{width}x{height}"),
        compressed = format!("{target_w}x{target_h}"),
        output_bytes = out.len(),
        over_budget = out.len() > TARGET_OUTPUT_BYTES,
        "attachment compressed"
    );

    Ok(out)
}

/// Compress an image off the interactive thread.
///
/// The caller awaits the re-encoded JPEG bytes; the decode/resize/encode
/// work runs on the blocking pool.
pub async fn compress(bytes: Vec<u8>) -> Result<Vec<u8>, AttachmentError> {
    tokio::task::spawn_blocking(move || compress_image(&bytes))
        .await
        .map_err(|e| AttachmentError::Decode(format!("compression task failed: {e}")))?
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
