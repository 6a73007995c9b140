//! Daily usage repository: one integer counter per calendar date.

use sage_core::DailyUsage;

use crate::database::Database;
use crate::error::StoreError;

/// Write-through repository for [`DailyUsage`] rows.
pub struct UsageRepo {
    db: Database,
}

impl UsageRepo {
    /// Create a repository over an open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Add units to a date's counter, creating the row if absent.
    /// Returns the new total for that date.
    pub fn add(&self, date: &str, units: u64) -> Result<u64, StoreError> {
        self.db.with_conn(|conn| {
            let _ = conn.execute(
                "INSERT INTO daily_usage (date, estimated_units) VALUES (?1, ?2)
                 ON CONFLICT(date) DO UPDATE SET
                     estimated_units = estimated_units + excluded.estimated_units",
                rusqlite::params![date, units],
            )?;
            conn.query_row(
                "SELECT estimated_units FROM daily_usage WHERE date = ?1",
                [date],
                |row| row.get(0),
            )
            .map_err(StoreError::from)
        })
    }

    /// Overwrite a date's counter (used by import).
    pub fn set(&self, date: &str, units: u64) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            let _ = conn.execute(
                "INSERT INTO daily_usage (date, estimated_units) VALUES (?1, ?2)
                 ON CONFLICT(date) DO UPDATE SET
                     estimated_units = excluded.estimated_units",
                rusqlite::params![date, units],
            )?;
            Ok(())
        })
    }

    /// Units accumulated on a date; zero if the row is absent.
    pub fn get(&self, date: &str) -> Result<u64, StoreError> {
        self.db.with_conn(|conn| {
            let units = conn
                .query_row(
                    "SELECT estimated_units FROM daily_usage WHERE date = ?1",
                    [date],
                    |row| row.get(0),
                )
                .unwrap_or(0);
            Ok(units)
        })
    }

    /// Load every usage row, oldest first.
    pub fn load_all(&self) -> Result<Vec<DailyUsage>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT date, estimated_units FROM daily_usage ORDER BY date ASC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(DailyUsage {
                        date: row.get(0)?,
                        estimated_units: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
