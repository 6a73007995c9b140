//! Context subsystem constants.

// =============================================================================
// Compaction
// =============================================================================

/// Turn count above which an append triggers compaction.
pub const DEFAULT_COMPACTION_THRESHOLD: usize = 20;

/// Turns kept verbatim after compaction (the recent window).
pub const DEFAULT_RECENT_WINDOW: usize = 10;

/// Characters of a user turn carried into the summary.
pub const USER_FRAGMENT_MAX_CHARS: usize = 100;

/// Characters of an assistant turn carried into the summary.
pub const ASSISTANT_FRAGMENT_MAX_CHARS: usize = 150;

/// Joins the per-turn fragments inside a summary clause.
pub const FRAGMENT_SEPARATOR: &str = "; ";

/// Hard cap on the standing summary when accumulating across compactions.
pub const SUMMARY_MAX_CHARS: usize = 2000;

// =============================================================================
// History window
// =============================================================================

/// Prefix for the synthetic user entry that carries the standing summary.
pub const CONTEXT_CARRYOVER_PREFIX: &str =
    "[Context from earlier in this conversation]";
