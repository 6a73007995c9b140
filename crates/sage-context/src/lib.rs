//! # sage-context
//!
//! The conversation context core: accumulates a user's running dialogue,
//! keeps it bounded in size and estimated cost, and decides what subset of
//! history goes out on each request.
//!
//! - **Conversation store**: the sole owner of conversation state, with
//!   write-through persistence that degrades to in-memory on failure
//! - **Compaction engine**: lossy sliding-window reduction of over-long
//!   conversations into a recent window plus a standing summary
//! - **History window**: the bounded, request-ready turn sequence
//! - **Cost tracker**: per-day estimated usage across all conversations
//! - **[`ConversationManager`]**: one explicitly constructed facade per
//!   session wiring the above together, with no global state

#![deny(unsafe_code)]

pub mod compaction;
pub mod constants;
pub mod error;
pub mod history;
pub mod manager;
pub mod store;
pub mod types;
pub mod usage;

pub use compaction::CompactionEngine;
pub use error::ContextError;
pub use history::optimized_history;
pub use manager::ConversationManager;
pub use store::ConversationStore;
pub use types::{
    CompactionConfig, CompactionPreview, ExportedState, HistoryEntry, SummaryPolicy,
    UsageSnapshot,
};
pub use usage::CostTracker;
