//! Upload validation: declared type and size, nothing else.

use crate::error::AttachmentError;

/// Size ceiling for any upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted raster image content types.
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] =
    ["image/png", "image/jpeg", "image/gif", "image/webp"];

/// The one accepted document content type.
pub const ACCEPTED_DOCUMENT_TYPE: &str = "application/pdf";

/// A user-supplied file as it arrives from the UI layer.
#[derive(Clone, Debug)]
pub struct AttachmentUpload {
    /// Original file name, for user-facing messages.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    /// Whether the declared type is a raster image (vs. a document).
    #[must_use]
    pub fn is_image(&self) -> bool {
        ACCEPTED_IMAGE_TYPES.contains(&self.content_type.as_str())
    }
}

/// Check an upload against the accepted-type set and the size ceiling.
///
/// Side-effect-free: the bytes are never inspected, only counted. Type
/// checks run before size checks so an oversized `.exe` reports the more
/// actionable error.
pub fn validate(upload: &AttachmentUpload) -> Result<(), AttachmentError> {
    let accepted = upload.is_image() || upload.content_type == ACCEPTED_DOCUMENT_TYPE;
    if !accepted {
        return Err(AttachmentError::UnsupportedType(format!(
            "{} ({})",
            upload.content_type, upload.file_name
        )));
    }

    let size = upload.bytes.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        return Err(AttachmentError::FileTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
