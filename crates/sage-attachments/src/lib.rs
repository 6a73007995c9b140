//! # sage-attachments
//!
//! Attachment preprocessing for conversation turns: validate a user upload,
//! shrink oversized images, and encode the result into a text-safe form that
//! can ride along in a turn.
//!
//! Validation is synchronous and side-effect-free. Compression and encoding
//! are CPU-bound and run on the blocking pool; callers await them off the
//! interactive thread and are free to disable the attach control until the
//! future resolves.

#![deny(unsafe_code)]

pub mod compress;
pub mod embed;
pub mod error;
pub mod validate;

pub use compress::{JPEG_QUALITY, MAX_DIMENSION, compress, target_dimensions};
pub use embed::to_embeddable;
pub use error::AttachmentError;
pub use validate::{AttachmentUpload, MAX_UPLOAD_BYTES, validate};
