//! Signup samples and the derived series views
//!
//! One canonical raw series per fetch cycle, with the hourly chart view and
//! the latest precise sample derived from it by pure functions.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::backend::SignupRow;

/// One observed (timestamp, cumulative count) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    /// Cumulative signup count. Monotonically non-decreasing in well-formed
    /// data, but never enforced here.
    pub count: i64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, count: i64) -> Self {
        Self { timestamp, count }
    }
}

/// A fixed-width chart interval. `count` is `None` when no sample fell in
/// the interval - distinct from a count of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub bucket_start: DateTime<Utc>,
    pub count: Option<i64>,
}

/// Immutable result of one fetch cycle
///
/// Holds the canonical raw series plus its two derived views: the
/// hourly-downsampled chart series and the single most recent raw sample
/// (kept at full precision for the current count and all trend inputs).
/// Replaced wholesale each cycle, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSnapshot {
    /// Full-precision rows, sorted by (timestamp, id)
    pub raw: Vec<Sample>,
    /// One sample per distinct hour, ascending
    pub hourly: Vec<Sample>,
    /// Most recent raw sample, untouched by hourly rounding
    pub latest: Option<Sample>,
    pub fetched_at: DateTime<Utc>,
}

impl SeriesSnapshot {
    /// Build the snapshot from raw backend rows
    ///
    /// Rows are sorted by (timestamp, id) so that hourly last-writer-wins is
    /// deterministic when the backend exposes row identifiers.
    pub fn from_rows(mut rows: Vec<SignupRow>, fetched_at: DateTime<Utc>) -> Self {
        rows.sort_by_key(|r| (r.timestamp, r.id));

        let raw: Vec<Sample> = rows
            .iter()
            .map(|r| Sample::new(r.timestamp, r.count))
            .collect();
        let hourly = downsample_hourly(&raw);
        let latest = raw.last().copied();

        Self {
            raw,
            hourly,
            latest,
            fetched_at,
        }
    }

    /// Empty snapshot for the "no data" state
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            raw: Vec::new(),
            hourly: Vec::new(),
            latest: None,
            fetched_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Downsample a raw series to one sample per distinct hour
///
/// Each timestamp is truncated to the top of its hour; when several samples
/// share an hour the chronologically last one wins (counts are cumulative,
/// so last = maximum within the hour). Output is sorted ascending.
pub fn downsample_hourly(raw: &[Sample]) -> Vec<Sample> {
    let mut by_hour: BTreeMap<DateTime<Utc>, i64> = BTreeMap::new();

    for sample in raw {
        // Later samples overwrite earlier ones within the same hour
        by_hour.insert(hour_floor(sample.timestamp), sample.count);
    }

    by_hour
        .into_iter()
        .map(|(timestamp, count)| Sample { timestamp, count })
        .collect()
}

/// Truncate a timestamp to the top of its hour
pub(crate) fn hour_floor(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::hours(1)).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, 0).unwrap()
    }

    fn row(id: i64, timestamp: DateTime<Utc>, count: i64) -> SignupRow {
        SignupRow {
            id: Some(id),
            timestamp,
            count,
        }
    }

    #[test]
    fn test_hour_floor() {
        assert_eq!(hour_floor(ts(9, 59)), ts(9, 0));
        assert_eq!(hour_floor(ts(9, 0)), ts(9, 0));
    }

    #[test]
    fn test_downsample_last_writer_wins() {
        let raw = vec![
            Sample::new(ts(9, 5), 10),
            Sample::new(ts(9, 40), 14),
            Sample::new(ts(10, 1), 20),
        ];

        let hourly = downsample_hourly(&raw);
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0], Sample::new(ts(9, 0), 14));
        assert_eq!(hourly[1], Sample::new(ts(10, 0), 20));
    }

    #[test]
    fn test_downsample_empty() {
        assert!(downsample_hourly(&[]).is_empty());
    }

    #[test]
    fn test_snapshot_sorts_rows_by_timestamp_then_id() {
        let rows = vec![
            row(3, ts(11, 0), 30),
            row(1, ts(9, 0), 10),
            row(2, ts(9, 0), 12),
        ];

        let snapshot = SeriesSnapshot::from_rows(rows, ts(12, 0));
        assert_eq!(snapshot.raw.len(), 3);
        assert_eq!(snapshot.raw[0].count, 10);
        assert_eq!(snapshot.raw[1].count, 12);
        assert_eq!(snapshot.latest, Some(Sample::new(ts(11, 0), 30)));
    }

    #[test]
    fn test_snapshot_retains_precise_latest() {
        let rows = vec![row(1, ts(9, 5), 10), row(2, ts(9, 40), 14)];

        let snapshot = SeriesSnapshot::from_rows(rows, ts(10, 0));
        // Hourly view rounds to 09:00, latest keeps the raw 09:40 instant
        assert_eq!(snapshot.hourly, vec![Sample::new(ts(9, 0), 14)]);
        assert_eq!(snapshot.latest, Some(Sample::new(ts(9, 40), 14)));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = SeriesSnapshot::from_rows(Vec::new(), ts(12, 0));
        assert!(snapshot.is_empty());
        assert!(snapshot.latest.is_none());
        assert!(snapshot.hourly.is_empty());
    }
}
