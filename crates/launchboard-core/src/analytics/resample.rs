//! Adaptive resampling onto a regular bucket grid
//!
//! Buckets raw samples into fixed-width intervals, choosing the width
//! from the series span alone. Empty buckets stay empty; gap-filling for
//! rendering is the caller's job via the interpolator.

use chrono::TimeDelta;

use crate::models::{Bucket, Sample};

/// Target point count for spans longer than a week
pub const LONG_RANGE_TARGET_POINTS: i64 = 240;

const SECS_PER_HOUR: i64 = 3600;
const SECS_PER_DAY: i64 = 86_400;

/// Bucket width for a series span
///
/// Pure function of the span: short spans get fine fixed resolutions,
/// longer spans are divided towards `target_points` buckets and rounded
/// to a whole hour or whole day so bucket boundaries stay legible.
pub fn bucket_width(span: TimeDelta, target_points: i64) -> TimeDelta {
    if span <= TimeDelta::hours(1) {
        return TimeDelta::minutes(1);
    }
    if span <= TimeDelta::days(1) {
        return TimeDelta::minutes(10);
    }
    if span <= TimeDelta::days(7) {
        return TimeDelta::hours(1);
    }

    let target = target_points.max(1);
    let raw_secs = (span.num_seconds() + target - 1) / target;
    let raw_secs = raw_secs.max(SECS_PER_HOUR);

    if raw_secs <= 24 * SECS_PER_HOUR {
        // Nearest whole hour
        let hours = (raw_secs + SECS_PER_HOUR / 2) / SECS_PER_HOUR;
        TimeDelta::hours(hours.max(1))
    } else {
        // Nearest whole day
        let days = (raw_secs + SECS_PER_DAY / 2) / SECS_PER_DAY;
        TimeDelta::days(days.max(1))
    }
}

/// Resample an ordered series onto a regular bucket grid
///
/// Walks from the first to the last sample time in steps of the adaptive
/// width. Each bucket `[start, start + width)` takes the first unconsumed
/// sample falling inside it; a single forward pointer visits every sample
/// at most once. Buckets with no sample keep `count: None` - a value is
/// never synthesized for a gap. The grid covers `floor(span / width) + 1`
/// buckets, including the one holding the last sample.
pub fn resample(series: &[Sample]) -> Vec<Bucket> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let last = series[series.len() - 1];

    let width = bucket_width(last.timestamp - first.timestamp, LONG_RANGE_TARGET_POINTS);
    let mut buckets = Vec::new();
    let mut next = 0;
    let mut start = first.timestamp;

    while start <= last.timestamp {
        let end = start + width;

        // Drop samples the previous bucket left behind
        while next < series.len() && series[next].timestamp < start {
            next += 1;
        }

        let count = if next < series.len() && series[next].timestamp < end {
            let count = series[next].count;
            next += 1;
            Some(count)
        } else {
            None
        };

        buckets.push(Bucket {
            bucket_start: start,
            count,
        });
        start = end;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
    }

    #[test]
    fn test_width_table_short_spans() {
        assert_eq!(
            bucket_width(TimeDelta::minutes(30), LONG_RANGE_TARGET_POINTS),
            TimeDelta::minutes(1)
        );
        assert_eq!(
            bucket_width(TimeDelta::hours(1), LONG_RANGE_TARGET_POINTS),
            TimeDelta::minutes(1)
        );
        assert_eq!(
            bucket_width(TimeDelta::hours(6), LONG_RANGE_TARGET_POINTS),
            TimeDelta::minutes(10)
        );
        assert_eq!(
            bucket_width(TimeDelta::days(1), LONG_RANGE_TARGET_POINTS),
            TimeDelta::minutes(10)
        );
        assert_eq!(
            bucket_width(TimeDelta::days(3), LONG_RANGE_TARGET_POINTS),
            TimeDelta::hours(1)
        );
        assert_eq!(
            bucket_width(TimeDelta::days(7), LONG_RANGE_TARGET_POINTS),
            TimeDelta::hours(1)
        );
    }

    #[test]
    fn test_width_table_long_spans() {
        // 10 days / 240 = exactly one hour
        assert_eq!(
            bucket_width(TimeDelta::days(10), LONG_RANGE_TARGET_POINTS),
            TimeDelta::hours(1)
        );
        // 100 days / 240 = 10 hours, rounds to a whole hour count
        assert_eq!(
            bucket_width(TimeDelta::days(100), LONG_RANGE_TARGET_POINTS),
            TimeDelta::hours(10)
        );
        // 2 years / 240 > 24h, rounds to whole days
        assert_eq!(
            bucket_width(TimeDelta::days(730), LONG_RANGE_TARGET_POINTS),
            TimeDelta::days(3)
        );
    }

    #[test]
    fn test_width_never_below_an_hour_for_long_spans() {
        assert_eq!(
            bucket_width(TimeDelta::days(8), 100_000),
            TimeDelta::hours(1)
        );
    }

    #[test]
    fn test_empty_series_resamples_to_nothing() {
        assert!(resample(&[]).is_empty());
    }

    #[test]
    fn test_bucket_count_matches_span() {
        // 30-minute span, 1-minute buckets: floor(30/1) + 1 = 31
        let s = vec![
            Sample::new(ts(14, 9, 0), 0),
            Sample::new(ts(14, 9, 12), 5),
            Sample::new(ts(14, 9, 30), 9),
        ];
        let buckets = resample(&s);
        assert_eq!(buckets.len(), 31);
        assert_eq!(buckets[0].bucket_start, ts(14, 9, 0));
        assert_eq!(buckets[30].bucket_start, ts(14, 9, 30));
    }

    #[test]
    fn test_each_sample_lands_in_one_bucket() {
        let s = vec![
            Sample::new(ts(14, 9, 0), 0),
            Sample::new(ts(14, 9, 12), 5),
            Sample::new(ts(14, 9, 30), 9),
        ];
        let buckets = resample(&s);

        let assigned: Vec<i64> = buckets.iter().filter_map(|b| b.count).collect();
        assert_eq!(assigned, vec![0, 5, 9]);
    }

    #[test]
    fn test_gaps_stay_absent() {
        let s = vec![Sample::new(ts(14, 9, 0), 0), Sample::new(ts(14, 9, 30), 9)];
        let buckets = resample(&s);

        assert_eq!(buckets[0].count, Some(0));
        assert_eq!(buckets[30].count, Some(9));
        for bucket in &buckets[1..30] {
            assert_eq!(bucket.count, None, "gap bucket must stay absent");
        }
    }

    #[test]
    fn test_burst_within_one_bucket_assigns_first_sample() {
        // Three samples inside the first minute: only the first is
        // assigned; the rest are consumed, never spilling into later
        // buckets.
        let s = vec![
            Sample::new(ts(14, 9, 0), 0),
            Sample::new(Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 10).unwrap(), 3),
            Sample::new(Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 40).unwrap(), 4),
            Sample::new(ts(14, 9, 5), 8),
        ];

        let buckets = resample(&s);
        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets[0].count, Some(0));
        for bucket in &buckets[1..5] {
            assert_eq!(bucket.count, None);
        }
        assert_eq!(buckets[5].count, Some(8));
    }

    #[test]
    fn test_sparse_daily_samples_over_ten_days() {
        // Daily samples spanning 10 days: the span divides to exactly
        // 1-hour buckets, 241 entries, all but eleven of them absent.
        let samples: Vec<Sample> = (0..=10u32)
            .map(|day| Sample::new(ts(1 + day, 0, 0), i64::from(day) * 100))
            .collect();
        let buckets = resample(&samples);

        assert_eq!(buckets.len(), 10 * 24 + 1);
        let filled = buckets.iter().filter(|b| b.count.is_some()).count();
        assert_eq!(filled, 11);
    }
}
