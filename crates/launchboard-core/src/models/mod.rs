//! Data models for launchboard

pub mod sample;
pub mod stats;

pub use sample::{downsample_hourly, Bucket, Sample, SeriesSnapshot};
pub use stats::{DisplayedCount, StatsSnapshot};
