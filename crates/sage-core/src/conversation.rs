//! Conversation model: one bounded dialogue between a user and the assistant.
//!
//! A [`Conversation`] is mutated only by turn appends and by compaction.
//! Compaction truncates the front of the turn list and records what it
//! removed in the append-only `compaction_log`; `estimated_total_units`
//! is a lifetime counter that keeps counting turns the compactor later
//! discards.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::ids::ConversationId;

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// Author of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The human user.
    User,
    /// The AI assistant.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversation kind
// ─────────────────────────────────────────────────────────────────────────────

/// Purpose tag for a conversation. Informational only; no component
/// branches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    /// General guidance assistant.
    Assistant,
    /// Exam preparation tutor.
    ExamTutor,
    /// Document drafting helper.
    DocumentWriter,
}

impl std::fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assistant => write!(f, "assistant"),
            Self::ExamTutor => write!(f, "exam_tutor"),
            Self::DocumentWriter => write!(f, "document_writer"),
        }
    }
}

impl std::str::FromStr for ConversationKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assistant" => Ok(Self::Assistant),
            "exam_tutor" => Ok(Self::ExamTutor),
            "document_writer" => Ok(Self::DocumentWriter),
            other => Err(format!("unknown conversation kind: {other}")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Turn
// ─────────────────────────────────────────────────────────────────────────────

/// One message in a conversation.
///
/// `estimated_units` is computed once when the turn is added and cached
/// here; it is never recomputed from `text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    /// Author of the message.
    pub role: Role,
    /// Message content.
    pub text: String,
    /// RFC 3339 creation timestamp.
    pub timestamp: String,
    /// Cached unit estimate for `text` at append time.
    pub estimated_units: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Compaction audit log
// ─────────────────────────────────────────────────────────────────────────────

/// Audit record for one compaction pass.
///
/// Only the latest summary is carried forward as standing context; the log
/// keeps every summary ever produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactionRecord {
    /// RFC 3339 timestamp of the compaction.
    pub timestamp: String,
    /// How many turns were removed from the working set.
    pub turns_removed: u32,
    /// The summary produced from the removed turns.
    pub summary: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversation
// ─────────────────────────────────────────────────────────────────────────────

/// One running dialogue with the assistant.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Opaque unique identifier.
    pub id: ConversationId,
    /// Purpose tag.
    pub kind: ConversationKind,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last mutation.
    pub last_updated_at: String,
    /// Working set of turns, insertion-ordered. Append-only except when
    /// compaction truncates the front.
    pub turns: Vec<Turn>,
    /// Standing summary from the most recent compaction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Append-only compaction audit log.
    #[serde(default)]
    pub compaction_log: Vec<CompactionRecord>,
    /// Lifetime sum of every turn's estimated units, including turns later
    /// removed by compaction. Monotonically non-decreasing.
    pub estimated_total_units: u64,
}

impl Conversation {
    /// Create an empty conversation with a fresh ID and zeroed counters.
    #[must_use]
    pub fn new(kind: ConversationKind) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: ConversationId::new(),
            kind,
            created_at: now.clone(),
            last_updated_at: now,
            turns: Vec::new(),
            context: None,
            compaction_log: Vec::new(),
            estimated_total_units: 0,
        }
    }

    /// Append a turn, advancing the lifetime unit counter and the
    /// last-updated timestamp.
    pub fn record_turn(&mut self, turn: Turn) {
        self.estimated_total_units += u64::from(turn.estimated_units);
        self.last_updated_at = Utc::now().to_rfc3339();
        self.turns.push(turn);
    }

    /// Stats snapshot for the UI layer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn stats(&self) -> ConversationStats {
        ConversationStats {
            id: self.id.clone(),
            turn_count: self.turns.len() as u32,
            compaction_count: self.compaction_log.len() as u32,
            estimated_total_units: self.estimated_total_units,
            created_at: self.created_at.clone(),
            last_updated_at: self.last_updated_at.clone(),
        }
    }

    /// Listing row for this conversation.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            kind: self.kind,
            turn_count: self.turns.len() as u32,
            created_at: self.created_at.clone(),
            last_updated_at: self.last_updated_at.clone(),
        }
    }
}

/// Per-conversation stats exposed to the calling application layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStats {
    /// Conversation ID.
    pub id: ConversationId,
    /// Turns currently in the working set.
    pub turn_count: u32,
    /// Number of compaction passes so far.
    pub compaction_count: u32,
    /// Lifetime estimated unit total.
    pub estimated_total_units: u64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last mutation.
    pub last_updated_at: String,
}

/// Listing row: enough to render a conversation picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Conversation ID.
    pub id: ConversationId,
    /// Purpose tag.
    pub kind: ConversationKind,
    /// Turns currently in the working set.
    pub turn_count: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last mutation.
    pub last_updated_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
