//! # sage-core
//!
//! Shared domain types for the Sage conversation core.
//!
//! - **IDs**: branded newtype identifiers (UUID v7, time-ordered)
//! - **Conversation model**: [`Conversation`], [`Turn`], [`Role`],
//!   [`ConversationKind`], and the compaction audit log
//! - **Usage model**: per-day estimated unit rows

#![deny(unsafe_code)]

pub mod conversation;
pub mod ids;
pub mod usage;

pub use conversation::{
    CompactionRecord, Conversation, ConversationKind, ConversationStats, ConversationSummary,
    Role, Turn,
};
pub use ids::ConversationId;
pub use usage::DailyUsage;
