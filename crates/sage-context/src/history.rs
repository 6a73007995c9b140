//! Bounded, request-ready history window.
//!
//! The external completion service receives the current working set of
//! turns, optionally led by one synthetic user entry that carries the
//! standing summary from past compactions. The working set is already
//! bounded by the compaction invariant, so the result never grows past
//! the recent window plus that one carryover entry.

use sage_core::{Conversation, Role};

use crate::constants::CONTEXT_CARRYOVER_PREFIX;
use crate::types::HistoryEntry;

/// The exact turn sequence to send for a conversation.
///
/// With standing context: one synthetic user entry (prefix + summary)
/// followed by every current turn. Without: exactly the current turns.
#[must_use]
pub fn optimized_history(conversation: &Conversation) -> Vec<HistoryEntry> {
    let mut entries = Vec::with_capacity(conversation.turns.len() + 1);

    if let Some(context) = conversation.context.as_deref().filter(|c| !c.is_empty()) {
        entries.push(HistoryEntry {
            role: Role::User,
            text: format!("{CONTEXT_CARRYOVER_PREFIX}\n\n{context}"),
        });
    }

    entries.extend(conversation.turns.iter().map(|t| HistoryEntry {
        role: t.role,
        text: t.text.clone(),
    }));

    entries
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
