//! Conversation repository: whole-record JSON blobs keyed by id.

use sage_core::{Conversation, ConversationId};

use crate::database::Database;
use crate::error::StoreError;

/// Write-through repository for [`Conversation`] records.
pub struct ConversationRepo {
    db: Database,
}

impl ConversationRepo {
    /// Create a repository over an open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert or replace a conversation record.
    pub fn upsert(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let data = serde_json::to_string(conversation)?;
        self.db.with_conn(|conn| {
            let _ = conn.execute(
                "INSERT INTO conversations (id, kind, data, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     kind = excluded.kind,
                     data = excluded.data,
                     updated_at = excluded.updated_at",
                rusqlite::params![
                    conversation.id.as_str(),
                    conversation.kind.to_string(),
                    data,
                    conversation.last_updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Fetch one conversation by id.
    pub fn get(&self, id: &ConversationId) -> Result<Conversation, StoreError> {
        let data: String = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT data FROM conversations WHERE id = ?1",
                [id.as_str()],
                |row| row.get(0),
            )
            .map_err(|_| StoreError::NotFound(format!("conversation {id}")))
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Load every stored conversation, most recently updated first.
    pub fn load_all(&self) -> Result<Vec<Conversation>, StoreError> {
        let blobs: Vec<String> = self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT data FROM conversations ORDER BY updated_at DESC")?;
            let rows = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        blobs
            .iter()
            .map(|data| serde_json::from_str(data).map_err(StoreError::from))
            .collect()
    }

    /// Delete a conversation row.
    pub fn delete(&self, id: &ConversationId) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            let rows = conn.execute("DELETE FROM conversations WHERE id = ?1", [id.as_str()])?;
            if rows == 0 {
                return Err(StoreError::NotFound(format!("conversation {id}")));
            }
            Ok(())
        })
    }

    /// Count stored conversations.
    pub fn count(&self) -> Result<u32, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
                .map_err(StoreError::from)
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sage_core::{ConversationKind, Role, Turn};

    fn repo() -> ConversationRepo {
        ConversationRepo::new(Database::in_memory().unwrap())
    }

    fn conversation_with_turn(text: &str) -> Conversation {
        let mut conv = Conversation::new(ConversationKind::Assistant);
        conv.record_turn(Turn {
            role: Role::User,
            text: text.to_owned(),
            timestamp: Utc::now().to_rfc3339(),
            estimated_units: 3,
        });
        conv
    }

    #[test]
    fn upsert_then_get_round_trips() {
        let repo = repo();
        let conv = conversation_with_turn("How do I apply for a scholarship?");
        repo.upsert(&conv).unwrap();

        let fetched = repo.get(&conv.id).unwrap();
        assert_eq!(fetched.id, conv.id);
        assert_eq!(fetched.turns, conv.turns);
        assert_eq!(fetched.estimated_total_units, conv.estimated_total_units);
    }

    #[test]
    fn upsert_replaces_existing_row() {
        let repo = repo();
        let mut conv = conversation_with_turn("first");
        repo.upsert(&conv).unwrap();

        conv.record_turn(Turn {
            role: Role::Assistant,
            text: "second".into(),
            timestamp: Utc::now().to_rfc3339(),
            estimated_units: 2,
        });
        repo.upsert(&conv).unwrap();

        let fetched = repo.get(&conv.id).unwrap();
        assert_eq!(fetched.turns.len(), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn get_missing_is_not_found() {
        let repo = repo();
        let err = repo.get(&ConversationId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn load_all_returns_every_row() {
        let repo = repo();
        let a = conversation_with_turn("a");
        let b = conversation_with_turn("b");
        repo.upsert(&a).unwrap();
        repo.upsert(&b).unwrap();

        let all = repo.load_all().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn delete_removes_row() {
        let repo = repo();
        let conv = conversation_with_turn("to delete");
        repo.upsert(&conv).unwrap();

        repo.delete(&conv.id).unwrap();
        assert!(repo.get(&conv.id).is_err());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let repo = repo();
        let err = repo.delete(&ConversationId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn context_and_log_survive_persistence() {
        let repo = repo();
        let mut conv = conversation_with_turn("long conversation");
        conv.context = Some("Earlier the user asked about deadlines.".into());
        conv.compaction_log.push(sage_core::CompactionRecord {
            timestamp: Utc::now().to_rfc3339(),
            turns_removed: 11,
            summary: conv.context.clone().unwrap(),
        });
        repo.upsert(&conv).unwrap();

        let fetched = repo.get(&conv.id).unwrap();
        assert_eq!(fetched.context, conv.context);
        assert_eq!(fetched.compaction_log.len(), 1);
        assert_eq!(fetched.compaction_log[0].turns_removed, 11);
    }

    #[test]
    fn survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sage.db");
        let conv = conversation_with_turn("durable");

        {
            let repo = ConversationRepo::new(Database::open(&path).unwrap());
            repo.upsert(&conv).unwrap();
        }

        let repo = ConversationRepo::new(Database::open(&path).unwrap());
        let fetched = repo.get(&conv.id).unwrap();
        assert_eq!(fetched.turns[0].text, "durable");
    }
}
