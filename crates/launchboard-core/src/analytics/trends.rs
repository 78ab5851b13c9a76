//! Trend statistics over the raw signup series
//!
//! Average rate, trailing-day growth, peak rate, and goal ETA, computed
//! in one pass from the full-precision series and the latest raw sample.

use chrono::{DateTime, TimeDelta, Utc};

use super::peak::peak_per_hour;
use super::safe_delta;
use crate::models::{Sample, StatsSnapshot};

/// Floor on the series span in hours, preventing division blow-up when
/// the first and latest samples share a timestamp
const MIN_SPAN_HOURS: f64 = 1e-6;

/// Derive a stats snapshot from the raw series
///
/// Returns `None` below two raw samples - surfaced by the store as a
/// loading/unavailable state rather than an error. `latest` is the most
/// recent raw sample, kept at full precision; the hourly chart view is
/// never used here.
pub fn compute_stats(
    raw: &[Sample],
    latest: Sample,
    target_count: i64,
    now: DateTime<Utc>,
) -> Option<StatsSnapshot> {
    if raw.len() < 2 {
        return None;
    }
    let first = raw[0];

    let span_hours = hours_between(first.timestamp, latest.timestamp).max(MIN_SPAN_HOURS);
    let average_per_hour = safe_delta(first.count as f64, latest.count as f64) / span_hours;

    let remaining = target_count - latest.count;
    let (estimated_completion, days_remaining) = if average_per_hour > 0.0 && remaining > 0 {
        let hours_remaining = remaining as f64 / average_per_hour;
        let completion = TimeDelta::try_milliseconds((hours_remaining * 3_600_000.0) as i64)
            .and_then(|delta| now.checked_add_signed(delta));
        (completion, (hours_remaining / 24.0).ceil() as i64)
    } else {
        // Caller renders "Completed" when latest.count >= target
        (None, 0)
    };

    Some(StatsSnapshot {
        total_signups: latest.count,
        average_per_hour,
        peak_per_hour: peak_per_hour(raw),
        estimated_completion,
        days_remaining,
        last_day_growth: trailing_day_growth(raw, now),
        computed_at: now,
    })
}

fn hours_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (b - a).num_milliseconds() as f64 / 3_600_000.0
}

/// Signups gained over the trailing 24 hours of `now`
///
/// Zero when fewer than two samples fall inside the window.
fn trailing_day_growth(raw: &[Sample], now: DateTime<Utc>) -> i64 {
    let cutoff = now - TimeDelta::hours(24);
    let window = &raw[raw.partition_point(|s| s.timestamp < cutoff)..];
    if window.len() < 2 {
        return 0;
    }
    safe_delta(
        window[0].count as f64,
        window[window.len() - 1].count as f64,
    ) as i64
}
