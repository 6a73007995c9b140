//! Context error type.

use sage_core::ConversationId;

/// Errors surfaced to the calling application layer.
///
/// Persistence failures never appear here: the store and the cost tracker
/// degrade to in-memory operation instead (see `sage-store`).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// A message was appended before any conversation was started.
    #[error("no active conversation; start one before appending messages")]
    NoActiveConversation,

    /// Lookup of an unknown conversation id.
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
}
