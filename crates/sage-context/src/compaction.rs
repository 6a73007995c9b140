//! Lossy sliding-window compaction.
//!
//! When a conversation outgrows the threshold, everything older than the
//! recent window is collapsed into one template summary sentence: user
//! turns contribute truncated "question" fragments, assistant turns
//! truncated "answer" fragments. The summary becomes the conversation's
//! standing context and the removed turns are gone from the working set;
//! only the audit log remembers them.

use chrono::Utc;
use tracing::{info, trace};

use sage_core::{CompactionRecord, Conversation, Role, Turn};

use crate::constants::{
    ASSISTANT_FRAGMENT_MAX_CHARS, FRAGMENT_SEPARATOR, SUMMARY_MAX_CHARS, USER_FRAGMENT_MAX_CHARS,
};
use crate::types::{CompactionConfig, CompactionPreview, SummaryPolicy};

/// Keeps the working set of turns bounded, trading detail for size.
#[derive(Clone, Debug, Default)]
pub struct CompactionEngine {
    config: CompactionConfig,
}

impl CompactionEngine {
    /// Create an engine with the given tunables.
    #[must_use]
    pub fn new(config: CompactionConfig) -> Self {
        Self { config }
    }

    /// The configured tunables.
    #[must_use]
    pub fn config(&self) -> &CompactionConfig {
        &self.config
    }

    /// Whether the conversation has outgrown the threshold.
    ///
    /// Checked after the append that may have caused the overflow.
    #[must_use]
    pub fn needs_compaction(&self, conversation: &Conversation) -> bool {
        conversation.turns.len() > self.config.threshold
    }

    /// What a compaction pass would do, without mutating anything.
    ///
    /// `None` when the conversation already fits the recent window.
    #[must_use]
    pub fn preview(&self, conversation: &Conversation) -> Option<CompactionPreview> {
        let (older, _recent) = split_turns(&conversation.turns, self.config.recent_window);
        if older.is_empty() {
            return None;
        }

        #[allow(clippy::cast_possible_truncation)]
        let turns_removed = older.len() as u32;
        Some(CompactionPreview {
            turns_removed,
            summary: self.build_summary(older, conversation.context.as_deref()),
        })
    }

    /// Collapse everything older than the recent window into a summary.
    ///
    /// Overwrites the standing context, appends an audit record, and
    /// truncates the turn list. The lifetime unit counter is untouched;
    /// removed turns keep their historical cost. Returns the audit record,
    /// or `None` when there was nothing to remove.
    pub fn compact(&self, conversation: &mut Conversation) -> Option<CompactionRecord> {
        let (older, recent) = split_turns(&conversation.turns, self.config.recent_window);
        if older.is_empty() {
            trace!(
                id = %conversation.id,
                turns = conversation.turns.len(),
                "compaction skipped: working set within recent window"
            );
            return None;
        }

        let summary = self.build_summary(older, conversation.context.as_deref());
        #[allow(clippy::cast_possible_truncation)]
        let turns_removed = older.len() as u32;
        let recent = recent.to_vec();

        let record = CompactionRecord {
            timestamp: Utc::now().to_rfc3339(),
            turns_removed,
            summary: summary.clone(),
        };

        conversation.turns = recent;
        conversation.context = Some(summary);
        conversation.compaction_log.push(record.clone());
        conversation.last_updated_at = record.timestamp.clone();

        info!(
            id = %conversation.id,
            turns_removed = record.turns_removed,
            turns_kept = conversation.turns.len(),
            summary_chars = record.summary.len(),
            "conversation compacted"
        );

        Some(record)
    }

    /// Compose the summary sentence from the turns being removed.
    fn build_summary(&self, older: &[Turn], prior_context: Option<&str>) -> String {
        let questions = join_fragments(older, Role::User, USER_FRAGMENT_MAX_CHARS);
        let answers = join_fragments(older, Role::Assistant, ASSISTANT_FRAGMENT_MAX_CHARS);

        let sentence = format!(
            "Earlier in this conversation, the user asked about: {questions}. \
             The assistant covered: {answers}."
        );

        match (self.config.summary_policy, prior_context) {
            (SummaryPolicy::Accumulate, Some(prior)) if !prior.is_empty() => {
                truncate_chars(&format!("{prior} {sentence}"), SUMMARY_MAX_CHARS)
            }
            _ => sentence,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Split turns into those to remove and the recent window to keep.
fn split_turns(turns: &[Turn], keep_recent: usize) -> (&[Turn], &[Turn]) {
    if turns.len() > keep_recent {
        turns.split_at(turns.len() - keep_recent)
    } else {
        (&[], turns)
    }
}

/// Join truncated fragments of one role's turns, in order.
fn join_fragments(turns: &[Turn], role: Role, max_chars: usize) -> String {
    turns
        .iter()
        .filter(|t| t.role == role)
        .map(|t| truncate_chars(&t.text, max_chars))
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR)
}

/// First `max_chars` characters of `text` (whole chars, UTF-8 safe).
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

// =============================================================================
// Tests
// =============================================================================
