//! Text-safe embedding of compressed attachment bytes.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::AttachmentError;

/// MIME type of compressed attachment payloads (compression always emits JPEG).
pub const EMBED_CONTENT_TYPE: &str = "image/jpeg";

/// Encode compressed bytes as a base64 data URL.
///
/// Synchronous core; use [`to_embeddable`] from async contexts.
#[must_use]
pub fn encode_data_url(bytes: &[u8]) -> String {
    format!("data:{EMBED_CONTENT_TYPE};base64,{}", STANDARD.encode(bytes))
}

/// Encode compressed bytes into a text-safe representation off the
/// interactive thread. The result can ride along in a conversation turn's
/// text or attachment slot.
pub async fn to_embeddable(bytes: Vec<u8>) -> Result<String, AttachmentError> {
    tokio::task::spawn_blocking(move || encode_data_url(&bytes))
        .await
        .map_err(|e| AttachmentError::Decode(format!("encoding task failed: {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
