//! Sliding-window peak rate detection
//!
//! Finds the maximum sustained per-hour delta over the whole series using
//! a 1-hour window anchored at each sample.

use chrono::TimeDelta;

use super::interpolate::value_at;
use super::safe_delta;
use crate::models::Sample;

/// Maximum signups gained over any 1-hour sliding window
///
/// For every sample time `t`, the window `[t - 1h, t]` is evaluated via
/// interpolation; since the window is exactly one hour wide, its delta is
/// the per-hour rate. Evaluating only at sample timestamps is sufficient:
/// the interpolated curve is piecewise linear, so the maximum over a
/// sliding window is attained with the window's right edge at a
/// breakpoint. Returns 0 with fewer than two samples; deltas are floored
/// at zero, so counter regressions never produce a negative peak.
pub fn peak_per_hour(series: &[Sample]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }

    let window = TimeDelta::hours(1);
    series
        .iter()
        .map(|sample| {
            let start = value_at(series, sample.timestamp - window);
            let end = value_at(series, sample.timestamp);
            safe_delta(start, end)
        })
        .fold(0.0, f64::max)
}
