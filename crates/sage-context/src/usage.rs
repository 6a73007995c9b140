//! Daily cost tracking across all conversations.
//!
//! One counter per calendar date, written through on every update. Like
//! the conversation store, a storage failure is logged once and drops the
//! tracker into in-memory-for-this-process mode. The caller always gets
//! an answer, just possibly a non-durable one.

use std::collections::HashMap;

use chrono::Utc;
use tracing::warn;

use sage_core::DailyUsage;
use sage_store::UsageRepo;
use sage_tokens::estimate_cost;

use crate::types::UsageSnapshot;

/// Key format for [`DailyUsage`] rows.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date key.
fn today_key() -> String {
    Utc::now().format(DATE_FORMAT).to_string()
}

/// Aggregates estimated usage per day, independent of any conversation's
/// lifecycle.
pub struct CostTracker {
    usage: HashMap<String, u64>,
    /// Dropped on first failure; `None` means in-memory-only mode.
    repo: Option<UsageRepo>,
}

impl CostTracker {
    /// Create a tracker backed by a repository, hydrating from it.
    #[must_use]
    pub fn with_repo(repo: UsageRepo) -> Self {
        let (usage, repo) = match repo.load_all() {
            Ok(rows) => {
                let map = rows
                    .into_iter()
                    .map(|row| (row.date, row.estimated_units))
                    .collect();
                (map, Some(repo))
            }
            Err(e) => {
                warn!(error = %e, "usage storage unavailable; continuing in memory");
                (HashMap::new(), None)
            }
        };
        Self { usage, repo }
    }

    /// Create a tracker with no persistence at all.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            usage: HashMap::new(),
            repo: None,
        }
    }

    /// Add units to today's counter.
    pub fn record(&mut self, units: u64) {
        let date = today_key();
        let _ = self.record_on(&date, units);
    }

    /// Add units to a specific date's counter. Returns the new total for
    /// that date. `record` delegates here; backfills use it directly.
    pub fn record_on(&mut self, date: &str, units: u64) -> u64 {
        let total = self
            .usage
            .entry(date.to_owned())
            .and_modify(|u| *u += units)
            .or_insert(units);
        let total = *total;

        if let Some(repo) = &self.repo {
            if let Err(e) = repo.add(date, units) {
                warn!(error = %e, "usage storage unavailable; continuing in memory");
                self.repo = None;
            }
        }
        total
    }

    /// Today's accumulated units with the derived monetary estimate.
    #[must_use]
    pub fn today(&self) -> UsageSnapshot {
        let units = self.units_on(&today_key());
        UsageSnapshot {
            units,
            estimated_cost: estimate_cost(units),
        }
    }

    /// Units accumulated on a specific date; zero if absent.
    #[must_use]
    pub fn units_on(&self, date: &str) -> u64 {
        self.usage.get(date).copied().unwrap_or(0)
    }

    /// Every usage row, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<DailyUsage> {
        let mut rows: Vec<DailyUsage> = self
            .usage
            .iter()
            .map(|(date, units)| DailyUsage {
                date: date.clone(),
                estimated_units: *units,
            })
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        rows
    }

    /// Snapshot of every counter, keyed by date.
    #[must_use]
    pub fn export(&self) -> HashMap<String, u64> {
        self.usage.clone()
    }

    /// Overwrite counters by date key (restore path: summing would
    /// double-count on re-import).
    pub fn import(&mut self, imported: HashMap<String, u64>) {
        for (date, units) in imported {
            if let Some(repo) = &self.repo {
                if let Err(e) = repo.set(&date, units) {
                    warn!(error = %e, "usage storage unavailable; continuing in memory");
                    self.repo = None;
                }
            }
            let _ = self.usage.insert(date, units);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sage_store::Database;
    use sage_tokens::RATE_PER_1000_UNITS;

    #[test]
    fn fresh_tracker_reports_zero_today() {
        let tracker = CostTracker::in_memory();
        let snapshot = tracker.today();
        assert_eq!(snapshot.units, 0);
        assert_eq!(snapshot.estimated_cost, 0.0);
    }

    #[test]
    fn recording_twice_accumulates() {
        let mut tracker = CostTracker::in_memory();
        tracker.record(500);
        tracker.record(500);
        assert_eq!(tracker.today().units, 1000);
    }

    #[test]
    fn cost_derives_from_fixed_rate() {
        let mut tracker = CostTracker::in_memory();
        tracker.record(2000);
        let snapshot = tracker.today();
        assert!((snapshot.estimated_cost - 2.0 * RATE_PER_1000_UNITS).abs() < 1e-12);
    }

    #[test]
    fn different_dates_are_independent_rows() {
        let mut tracker = CostTracker::in_memory();
        let _ = tracker.record_on("2026-08-06", 100);
        let _ = tracker.record_on("2026-08-07", 200);

        assert_eq!(tracker.units_on("2026-08-06"), 100);
        assert_eq!(tracker.units_on("2026-08-07"), 200);
        assert_eq!(tracker.history().len(), 2);
    }

    #[test]
    fn record_on_returns_running_total() {
        let mut tracker = CostTracker::in_memory();
        assert_eq!(tracker.record_on("2026-08-07", 300), 300);
        assert_eq!(tracker.record_on("2026-08-07", 200), 500);
    }

    #[test]
    fn history_is_sorted_by_date() {
        let mut tracker = CostTracker::in_memory();
        let _ = tracker.record_on("2026-08-07", 1);
        let _ = tracker.record_on("2026-08-05", 1);
        let _ = tracker.record_on("2026-08-06", 1);

        let dates: Vec<String> = tracker.history().into_iter().map(|r| r.date).collect();
        assert_eq!(dates, ["2026-08-05", "2026-08-06", "2026-08-07"]);
    }

    #[test]
    fn persists_and_hydrates() {
        let db = Database::in_memory().unwrap();
        {
            let mut tracker = CostTracker::with_repo(UsageRepo::new(db.clone()));
            let _ = tracker.record_on("2026-08-07", 750);
        }

        let tracker = CostTracker::with_repo(UsageRepo::new(db));
        assert_eq!(tracker.units_on("2026-08-07"), 750);
    }

    #[test]
    fn import_overwrites_by_date() {
        let mut tracker = CostTracker::in_memory();
        let _ = tracker.record_on("2026-08-07", 900);

        let mut imported = HashMap::new();
        let _ = imported.insert("2026-08-07".to_owned(), 100u64);
        tracker.import(imported);

        assert_eq!(tracker.units_on("2026-08-07"), 100);
    }
}
