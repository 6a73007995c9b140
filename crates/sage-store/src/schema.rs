//! SQL DDL for the sage-store database.
//! WAL mode enabled at connection time.

/// Current schema version stamp.
pub const SCHEMA_VERSION: u32 = 1;

/// Table definitions. The conversation record itself lives in `data` as a
/// JSON blob; `kind` and `updated_at` are denormalized for listing without
/// deserializing every row.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS conversations (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    data TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS daily_usage (
    date TEXT PRIMARY KEY,
    estimated_units INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_conversations_updated ON conversations(updated_at);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);
";

/// Connection pragmas applied before any statement runs.
pub const PRAGMAS: &str = r"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
";
