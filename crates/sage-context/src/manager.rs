//! Per-session conversation manager.
//!
//! One [`ConversationManager`] per caller session, constructed explicitly
//! and passed by reference; the active-conversation pointer lives on the
//! store it owns, not in module state. This is the single surface the UI
//! layer talks to; attachment preprocessing is upstream of it (see
//! `sage-attachments`).

use std::path::Path;

use tracing::warn;

use sage_core::{
    ConversationId, ConversationKind, ConversationStats, ConversationSummary, Role, Turn,
};
use sage_store::{ConversationRepo, Database, UsageRepo};

use crate::error::ContextError;
use crate::history::optimized_history;
use crate::store::ConversationStore;
use crate::types::{CompactionConfig, ExportedState, HistoryEntry, UsageSnapshot};
use crate::usage::CostTracker;

/// Facade over the conversation store and the cost tracker.
pub struct ConversationManager {
    store: ConversationStore,
    usage: CostTracker,
}

impl ConversationManager {
    /// Open a manager over a SQLite database at `path`.
    ///
    /// If the database cannot be opened, the manager still comes up
    /// in-memory only rather than failing the session.
    #[must_use]
    pub fn open(path: &Path, config: CompactionConfig) -> Self {
        match Database::open(path) {
            Ok(db) => Self {
                store: ConversationStore::with_repo(ConversationRepo::new(db.clone()), config),
                usage: CostTracker::with_repo(UsageRepo::new(db)),
            },
            Err(e) => {
                warn!(error = %e, "storage unavailable; session will not be durable");
                Self::ephemeral(config)
            }
        }
    }

    /// A manager with no persistence at all (tests, private sessions).
    #[must_use]
    pub fn ephemeral(config: CompactionConfig) -> Self {
        Self {
            store: ConversationStore::in_memory(config),
            usage: CostTracker::in_memory(),
        }
    }

    // ── Conversations ───────────────────────────────────────────────────

    /// Start a new conversation and make it active.
    pub fn start_new_conversation(&mut self, kind: ConversationKind) -> ConversationId {
        self.store.start_new(kind)
    }

    /// Append a message to the active conversation.
    pub fn add_message(&mut self, role: Role, text: &str) -> Result<Turn, ContextError> {
        self.store.add_message(role, text)
    }

    /// Switch the active conversation.
    pub fn set_active_conversation(&mut self, id: &ConversationId) -> Result<(), ContextError> {
        self.store.set_active(id)
    }

    /// The bounded, request-ready turn sequence for a conversation
    /// (the active one when `id` is `None`).
    pub fn get_optimized_history(
        &self,
        id: Option<&ConversationId>,
    ) -> Result<Vec<HistoryEntry>, ContextError> {
        Ok(optimized_history(self.resolve(id)?))
    }

    /// Stats for a conversation (the active one when `id` is `None`).
    pub fn get_conversation_stats(
        &self,
        id: Option<&ConversationId>,
    ) -> Result<ConversationStats, ContextError> {
        Ok(self.resolve(id)?.stats())
    }

    /// Listing rows, most recently updated first.
    #[must_use]
    pub fn list_conversations(&self) -> Vec<ConversationSummary> {
        self.store.list()
    }

    /// Delete a conversation. Returns whether it existed.
    pub fn delete_conversation(&mut self, id: &ConversationId) -> bool {
        self.store.delete(id)
    }

    // ── Export / import ─────────────────────────────────────────────────

    /// Serializable snapshot of conversations and usage counters.
    #[must_use]
    pub fn export_all(&self) -> ExportedState {
        ExportedState {
            conversations: self.store.export(),
            daily_usage: self.usage.export(),
        }
    }

    /// Merge a snapshot in: conversations by id, usage by date, imported
    /// records overwriting existing ones. Returns how many conversation
    /// records were applied.
    pub fn import_all(&mut self, state: ExportedState) -> usize {
        self.usage.import(state.daily_usage);
        self.store.import(state.conversations)
    }

    // ── Usage ───────────────────────────────────────────────────────────

    /// Report units consumed by a completed request.
    pub fn record_usage(&mut self, units: u64) {
        self.usage.record(units);
    }

    /// Today's accumulated usage and derived cost estimate.
    #[must_use]
    pub fn get_today_usage(&self) -> UsageSnapshot {
        self.usage.today()
    }

    /// The cost tracker, for callers that need date-level access.
    #[must_use]
    pub fn usage(&self) -> &CostTracker {
        &self.usage
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn resolve(
        &self,
        id: Option<&ConversationId>,
    ) -> Result<&sage_core::Conversation, ContextError> {
        match id {
            Some(id) => self.store.get(id),
            None => self.store.active(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CONTEXT_CARRYOVER_PREFIX;

    fn manager() -> ConversationManager {
        ConversationManager::ephemeral(CompactionConfig::default())
    }

    // -- conversation surface --

    #[test]
    fn start_append_and_read_history() {
        let mut mgr = manager();
        let _ = mgr.start_new_conversation(ConversationKind::Assistant);
        let _ = mgr.add_message(Role::User, "How do I enroll?").unwrap();
        let _ = mgr.add_message(Role::Assistant, "Through the portal.").unwrap();

        let history = mgr.get_optimized_history(None).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "How do I enroll?");
    }

    #[test]
    fn history_without_start_fails() {
        let mgr = manager();
        assert_eq!(
            mgr.get_optimized_history(None).unwrap_err(),
            ContextError::NoActiveConversation
        );
    }

    #[test]
    fn history_by_explicit_id() {
        let mut mgr = manager();
        let first = mgr.start_new_conversation(ConversationKind::Assistant);
        let _ = mgr.add_message(Role::User, "first conversation").unwrap();
        let _ = mgr.start_new_conversation(ConversationKind::ExamTutor);

        let history = mgr.get_optimized_history(Some(&first)).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "first conversation");
    }

    #[test]
    fn history_of_unknown_id_fails() {
        let mgr = manager();
        let ghost = ConversationId::new();
        assert_eq!(
            mgr.get_optimized_history(Some(&ghost)).unwrap_err(),
            ContextError::NotFound(ghost)
        );
    }

    #[test]
    fn long_conversation_history_is_bounded() {
        let mut mgr = manager();
        let _ = mgr.start_new_conversation(ConversationKind::Assistant);
        for i in 0..21 {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            let _ = mgr.add_message(role, &format!("message {i}")).unwrap();
        }

        let history = mgr.get_optimized_history(None).unwrap();
        // Recent window plus the carryover entry
        assert_eq!(history.len(), 11);
        assert!(history[0].text.starts_with(CONTEXT_CARRYOVER_PREFIX));
        assert_eq!(history[0].role, Role::User);
    }

    #[test]
    fn stats_track_compaction_and_lifetime_units() {
        let mut mgr = manager();
        let id = mgr.start_new_conversation(ConversationKind::Assistant);

        let mut expected: u64 = 0;
        for i in 0..21 {
            let turn = mgr.add_message(Role::User, &format!("message {i}")).unwrap();
            expected += u64::from(turn.estimated_units);
        }

        let stats = mgr.get_conversation_stats(Some(&id)).unwrap();
        assert_eq!(stats.turn_count, 10);
        assert_eq!(stats.compaction_count, 1);
        assert_eq!(stats.estimated_total_units, expected);
    }

    #[test]
    fn delete_reports_existence() {
        let mut mgr = manager();
        let id = mgr.start_new_conversation(ConversationKind::Assistant);
        assert!(mgr.delete_conversation(&id));
        assert!(!mgr.delete_conversation(&id));
    }

    // -- export / import --

    #[test]
    fn export_import_round_trips_into_empty_manager() {
        let mut source = manager();
        let id = source.start_new_conversation(ConversationKind::DocumentWriter);
        let _ = source.add_message(Role::User, "draft my essay outline").unwrap();
        source.record_usage(500);

        let mut target = manager();
        let applied = target.import_all(source.export_all());
        assert_eq!(applied, 1);

        let conv_stats = target.get_conversation_stats(Some(&id)).unwrap();
        assert_eq!(conv_stats.turn_count, 1);
        assert_eq!(target.get_today_usage().units, 500);
    }

    // -- usage surface --

    #[test]
    fn usage_accumulates_across_conversations() {
        let mut mgr = manager();
        mgr.record_usage(500);
        mgr.record_usage(500);

        let snapshot = mgr.get_today_usage();
        assert_eq!(snapshot.units, 1000);
        assert!(snapshot.estimated_cost > 0.0);
    }

    // -- durability --

    #[test]
    fn reopening_from_disk_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sage.db");

        let id = {
            let mut mgr = ConversationManager::open(&path, CompactionConfig::default());
            let id = mgr.start_new_conversation(ConversationKind::Assistant);
            let _ = mgr.add_message(Role::User, "persist me").unwrap();
            mgr.record_usage(250);
            id
        };

        let mgr = ConversationManager::open(&path, CompactionConfig::default());
        let stats = mgr.get_conversation_stats(Some(&id)).unwrap();
        assert_eq!(stats.turn_count, 1);
        assert_eq!(mgr.get_today_usage().units, 250);
        assert_eq!(mgr.list_conversations().len(), 1);
    }

    #[test]
    fn unopenable_database_still_yields_a_working_manager() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the database path makes open fail
        let path = dir.path().join("occupied");
        std::fs::create_dir_all(&path).unwrap();

        let mut mgr = ConversationManager::open(&path, CompactionConfig::default());
        let _ = mgr.start_new_conversation(ConversationKind::Assistant);
        let turn = mgr.add_message(Role::User, "still works").unwrap();
        assert_eq!(turn.text, "still works");
    }
}
