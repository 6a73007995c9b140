//! Configuration and exchange types for the context subsystem.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use sage_core::{Conversation, ConversationId, Role};

use crate::constants::{DEFAULT_COMPACTION_THRESHOLD, DEFAULT_RECENT_WINDOW};

// ─────────────────────────────────────────────────────────────────────────────
// Compaction configuration
// ─────────────────────────────────────────────────────────────────────────────

/// How compaction treats the previous standing summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPolicy {
    /// Each compaction's summary stands alone; earlier summaries survive
    /// only in the audit log. Bounded by construction.
    #[default]
    Replace,
    /// Fold the prior summary into the new one as a leading clause, then
    /// truncate to a hard cap. Preserves continuity with bounded growth.
    Accumulate,
}

/// Tunables for the compaction engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactionConfig {
    /// Turn count above which an append triggers compaction.
    pub threshold: usize,
    /// Turns kept verbatim after compaction.
    pub recent_window: usize,
    /// Standing-summary accumulation policy.
    pub summary_policy: SummaryPolicy,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_COMPACTION_THRESHOLD,
            recent_window: DEFAULT_RECENT_WINDOW,
            summary_policy: SummaryPolicy::default(),
        }
    }
}

/// Non-mutating look at what a compaction pass would do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactionPreview {
    /// Turns that would be removed from the working set.
    pub turns_removed: u32,
    /// The summary that would become the standing context.
    pub summary: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// History window
// ─────────────────────────────────────────────────────────────────────────────

/// One request-ready entry for the external completion service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Role the entry is sent under.
    pub role: Role,
    /// Entry text.
    pub text: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Export / import
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable snapshot of everything the core persists.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedState {
    /// Every conversation, keyed by id.
    pub conversations: HashMap<ConversationId, Conversation>,
    /// Daily usage counters, keyed by `%Y-%m-%d` date.
    pub daily_usage: HashMap<String, u64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Usage
// ─────────────────────────────────────────────────────────────────────────────

/// Today's accumulated usage with its derived monetary estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    /// Estimated units accumulated today.
    pub units: u64,
    /// Monetary estimate at the fixed rate.
    pub estimated_cost: f64,
}
