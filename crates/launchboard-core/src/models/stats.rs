//! Trend statistics snapshot and the live-updated count view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trend statistics derived from the full raw series
///
/// Recomputed atomically each refresh cycle; never partially updated.
/// Absent entirely (the store holds `None`) while fewer than two raw
/// samples exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Cumulative count from the latest raw sample
    pub total_signups: i64,
    /// Average signups per hour over the whole series
    pub average_per_hour: f64,
    /// Maximum sustained per-hour delta over any 1-hour sliding window
    pub peak_per_hour: f64,
    /// Projected instant at which the target is reached, when projectable
    pub estimated_completion: Option<DateTime<Utc>>,
    /// Whole days until estimated completion; 0 when no projection exists
    pub days_remaining: i64,
    /// Signups gained over the trailing 24 hours
    pub last_day_growth: i64,
    pub computed_at: DateTime<Utc>,
}

impl StatsSnapshot {
    /// Progress towards a target count, clamped to 100%
    pub fn percent_of(&self, target_count: i64) -> f64 {
        if target_count <= 0 {
            return 100.0;
        }
        (self.total_signups as f64 / target_count as f64 * 100.0).min(100.0)
    }

    /// Whether the target has been reached
    pub fn is_complete(&self, target_count: i64) -> bool {
        self.total_signups >= target_count
    }
}

/// The scalar "current count" shown by the display layer
///
/// Patched in place by push events between fetch cycles; overwritten from
/// the latest raw sample on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedCount {
    pub count: i64,
    /// When this count was last observed or pushed
    pub as_of: DateTime<Utc>,
}

impl DisplayedCount {
    pub fn new(count: i64, as_of: DateTime<Utc>) -> Self {
        Self { count, as_of }
    }
}
