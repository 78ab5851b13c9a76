//! Analytics over the signup series
//!
//! Pure functions from ordered samples to chart buckets and trend stats:
//! binary-search interpolation, sliding-window peak detection, adaptive
//! resampling, and ETA projection.

use chrono::{DateTime, TimeDelta, Utc};

pub mod interpolate;
pub mod peak;
pub mod resample;
pub mod trends;

pub use interpolate::value_at;
pub use peak::peak_per_hour;
pub use resample::{bucket_width, resample, LONG_RANGE_TARGET_POINTS};
pub use trends::compute_stats;

/// Display range selection for the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayRange {
    /// Everything since the first sample
    AllTime,
    /// Trailing 7 days
    Last7d,
    /// Trailing 24 hours
    Last24h,
    /// Trailing hour
    LastHour,
}

impl DisplayRange {
    /// Inclusive lower bound for the range, `None` for all-time
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DisplayRange::AllTime => None,
            DisplayRange::Last7d => Some(now - TimeDelta::days(7)),
            DisplayRange::Last24h => Some(now - TimeDelta::hours(24)),
            DisplayRange::LastHour => Some(now - TimeDelta::hours(1)),
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            DisplayRange::AllTime => "All time",
            DisplayRange::Last7d => "7 days",
            DisplayRange::Last24h => "24 hours",
            DisplayRange::LastHour => "1 hour",
        }
    }
}

/// Non-negative delta between two cumulative readings
///
/// Counter regressions in the backend would otherwise leak negative rates
/// into every figure derived from the series; flooring happens here, once,
/// for all rate computations.
pub fn safe_delta(earlier: f64, later: f64) -> f64 {
    (later - earlier).max(0.0)
}
