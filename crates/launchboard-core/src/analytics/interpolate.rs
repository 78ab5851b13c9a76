//! Linear interpolation over an ordered sample series
//!
//! Estimates the cumulative count at an arbitrary instant via binary
//! search plus linear interpolation, clamping at the boundaries instead
//! of extrapolating.

use chrono::{DateTime, Utc};

use crate::models::Sample;

/// Estimate the count at instant `t`
///
/// The series must be sorted ascending by timestamp (precondition, not
/// re-validated). `t` at or before the first sample returns the first
/// count; at or after the last sample returns the last count; an exact
/// timestamp hit returns that sample's count; anything else is linearly
/// interpolated between the tightest bracketing pair. O(log n) per query.
///
/// An empty series returns 0.0 so callers can stay total; every caller
/// here guards on series length before the value matters.
pub fn value_at(series: &[Sample], t: DateTime<Utc>) -> f64 {
    let Some(first) = series.first() else {
        return 0.0;
    };
    let last = series[series.len() - 1];

    if t <= first.timestamp {
        return first.count as f64;
    }
    if t >= last.timestamp {
        return last.count as f64;
    }

    // First index with timestamp >= t; in (0, len) since t is interior
    let right = series.partition_point(|s| s.timestamp < t);
    let p_r = series[right];
    if p_r.timestamp == t {
        return p_r.count as f64;
    }
    let p_l = series[right - 1];

    let span = (p_r.timestamp - p_l.timestamp).num_milliseconds() as f64;
    let offset = (t - p_l.timestamp).num_milliseconds() as f64;
    p_l.count as f64 + (p_r.count - p_l.count) as f64 * offset / span
}
