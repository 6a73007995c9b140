//! Attachment error type.

/// Errors surfaced by attachment preprocessing.
///
/// `UnsupportedType` and `FileTooLarge` come from validation and carry a
/// user-presentable message. `Decode` covers a validated upload whose bytes
/// turn out not to be a readable image.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    /// Declared content type is outside the accepted set.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// Upload exceeds the size ceiling.
    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge {
        /// Actual upload size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },

    /// Bytes could not be decoded as an image.
    #[error("could not decode image: {0}")]
    Decode(String),
}
