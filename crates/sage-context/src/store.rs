//! Conversation store: the sole owner of conversation state.
//!
//! All reads are served from the in-memory map; every mutation runs an
//! explicit persist step that writes the whole record through to the
//! repository before returning. A repository failure is logged once and
//! drops the store into in-memory-only mode for the rest of the session;
//! conversation history is not mission-critical state, so degraded beats
//! crashed.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use sage_core::{
    Conversation, ConversationId, ConversationKind, ConversationSummary, Role, Turn,
};
use sage_store::ConversationRepo;
use sage_tokens::estimate_units;

use crate::compaction::CompactionEngine;
use crate::error::ContextError;
use crate::types::CompactionConfig;

/// Durable keyed record of conversations, with an explicit active pointer.
pub struct ConversationStore {
    conversations: HashMap<ConversationId, Conversation>,
    /// The conversation new turns append to. Switching is an explicit
    /// operation, never a side effect of reading.
    active: Option<ConversationId>,
    compactor: CompactionEngine,
    /// Dropped on first failure; `None` means in-memory-only mode.
    repo: Option<ConversationRepo>,
}

impl ConversationStore {
    /// Create a store backed by a repository, hydrating from it.
    ///
    /// A failed hydration degrades straight to in-memory mode.
    #[must_use]
    pub fn with_repo(repo: ConversationRepo, config: CompactionConfig) -> Self {
        let (conversations, repo) = match repo.load_all() {
            Ok(all) => {
                info!(count = all.len(), "conversations hydrated from store");
                let map = all.into_iter().map(|c| (c.id.clone(), c)).collect();
                (map, Some(repo))
            }
            Err(e) => {
                warn!(error = %e, "conversation storage unavailable; continuing in memory");
                (HashMap::new(), None)
            }
        };

        Self {
            conversations,
            active: None,
            compactor: CompactionEngine::new(config),
            repo,
        }
    }

    /// Create a store with no persistence at all (tests, private sessions).
    #[must_use]
    pub fn in_memory(config: CompactionConfig) -> Self {
        Self {
            conversations: HashMap::new(),
            active: None,
            compactor: CompactionEngine::new(config),
            repo: None,
        }
    }

    /// Whether mutations are still reaching durable storage.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.repo.is_some()
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Create an empty conversation, make it active, persist it.
    pub fn start_new(&mut self, kind: ConversationKind) -> ConversationId {
        let conversation = Conversation::new(kind);
        let id = conversation.id.clone();
        let _ = self.conversations.insert(id.clone(), conversation);
        self.active = Some(id.clone());
        self.persist(&id);
        id
    }

    /// Append a turn to the active conversation.
    ///
    /// Computes and caches the unit estimate, advances the lifetime
    /// counter, and compacts before returning when the append pushes the
    /// working set over the threshold. The returned [`Turn`] is the one
    /// appended.
    pub fn add_message(&mut self, role: Role, text: &str) -> Result<Turn, ContextError> {
        let id = self
            .active
            .clone()
            .ok_or(ContextError::NoActiveConversation)?;

        let turn = Turn {
            role,
            text: text.to_owned(),
            timestamp: Utc::now().to_rfc3339(),
            estimated_units: estimate_units(text),
        };

        {
            // Active id always resolves; delete() clears the pointer.
            let conversation = self
                .conversations
                .get_mut(&id)
                .ok_or(ContextError::NoActiveConversation)?;
            conversation.record_turn(turn.clone());

            if self.compactor.needs_compaction(conversation) {
                let _ = self.compactor.compact(conversation);
            }
        }

        self.persist(&id);
        Ok(turn)
    }

    /// Make an existing conversation the active one.
    pub fn set_active(&mut self, id: &ConversationId) -> Result<(), ContextError> {
        if !self.conversations.contains_key(id) {
            return Err(ContextError::NotFound(id.clone()));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    /// The active conversation's id, if any.
    #[must_use]
    pub fn active_id(&self) -> Option<&ConversationId> {
        self.active.as_ref()
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Fetch one conversation.
    pub fn get(&self, id: &ConversationId) -> Result<&Conversation, ContextError> {
        self.conversations
            .get(id)
            .ok_or_else(|| ContextError::NotFound(id.clone()))
    }

    /// The active conversation.
    pub fn active(&self) -> Result<&Conversation, ContextError> {
        let id = self.active.as_ref().ok_or(ContextError::NoActiveConversation)?;
        self.get(id)
    }

    /// Listing rows, most recently updated first.
    #[must_use]
    pub fn list(&self) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> =
            self.conversations.values().map(Conversation::summary).collect();
        // RFC 3339 UTC timestamps sort lexicographically
        summaries.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at));
        summaries
    }

    /// Number of stored conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    // ── Bulk operations ─────────────────────────────────────────────────

    /// Delete a conversation. Returns whether it existed.
    pub fn delete(&mut self, id: &ConversationId) -> bool {
        let existed = self.conversations.remove(id).is_some();
        if existed {
            if self.active.as_ref() == Some(id) {
                self.active = None;
            }
            if let Some(repo) = &self.repo {
                if let Err(e) = repo.delete(id) {
                    warn!(error = %e, "conversation storage unavailable; continuing in memory");
                    self.repo = None;
                }
            }
        }
        existed
    }

    /// Snapshot of every conversation, keyed by id.
    #[must_use]
    pub fn export(&self) -> HashMap<ConversationId, Conversation> {
        self.conversations.clone()
    }

    /// Merge conversations in by id; imported records overwrite existing
    /// ones of the same id. Returns how many records were applied.
    pub fn import(&mut self, imported: HashMap<ConversationId, Conversation>) -> usize {
        let count = imported.len();
        for (id, conversation) in imported {
            let _ = self.conversations.insert(id.clone(), conversation);
            self.persist(&id);
        }
        count
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Write one conversation through to the repository.
    ///
    /// On failure, logs once and degrades to in-memory mode.
    fn persist(&mut self, id: &ConversationId) {
        let Some(repo) = &self.repo else { return };
        let Some(conversation) = self.conversations.get(id) else {
            return;
        };
        if let Err(e) = repo.upsert(conversation) {
            warn!(error = %e, "conversation storage unavailable; continuing in memory");
            self.repo = None;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
