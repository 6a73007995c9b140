//! Daily usage model for the cost tracker.

use serde::{Deserialize, Serialize};

/// One row per calendar date of accumulated estimated units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsage {
    /// Calendar date key, `%Y-%m-%d`.
    pub date: String,
    /// Estimated units accumulated on that date, across all conversations.
    pub estimated_units: u64,
}
