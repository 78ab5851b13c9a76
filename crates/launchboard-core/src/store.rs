//! Counter state store with parking_lot::RwLock
//!
//! Holds the series snapshot, trend stats, and the displayed count. Every
//! writer path replaces whole values under short write locks; nothing is
//! mutated field by field, so overlapping refreshes stay last-finisher-wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::analytics::{compute_stats, resample, value_at, DisplayRange};
use crate::backend::{RowChangeEvent, SignupBackend};
use crate::error::FetchReport;
use crate::event::{CounterEvent, EventBus};
use crate::models::{Bucket, DisplayedCount, SeriesSnapshot, StatsSnapshot};
use crate::pager::SignupPager;

/// Launch instant of the signup campaign: 2026-01-15T00:00:00Z
const LAUNCH_UNIX_SECS: i64 = 1_768_435_200;

/// Configuration for the counter store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterConfig {
    /// Signup goal the ETA projects towards
    pub target_count: i64,
    /// Campaign launch instant, rendered as the chart origin
    pub launch_at: DateTime<Utc>,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            target_count: 5000,
            launch_at: DateTime::from_timestamp(LAUNCH_UNIX_SECS, 0)
                .unwrap_or(DateTime::UNIX_EPOCH),
        }
    }
}

/// Central store for the signup counter
///
/// One writer path per field: `refresh` replaces the snapshot, stats, and
/// displayed count wholesale; `apply_row_change` only ever touches the
/// displayed count. Readers get clones or Arcs, never lock guards.
pub struct CounterStore {
    config: CounterConfig,

    /// Latest fetch cycle's series views
    series: RwLock<Arc<SeriesSnapshot>>,

    /// Trend stats; `None` until two raw samples exist
    stats: RwLock<Option<StatsSnapshot>>,

    /// The scalar count the display shows, patched by push events
    displayed: RwLock<Option<DisplayedCount>>,

    /// Outcome of the most recent pagination pass
    last_report: RwLock<FetchReport>,

    /// True until the first fetch cycle completes
    loading: RwLock<bool>,

    /// Event bus for notifying subscribers
    event_bus: EventBus,
}

impl CounterStore {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            series: RwLock::new(Arc::new(SeriesSnapshot::empty(config.launch_at))),
            stats: RwLock::new(None),
            displayed: RwLock::new(None),
            last_report: RwLock::new(FetchReport::new()),
            loading: RwLock::new(true),
            event_bus: EventBus::default_capacity(),
        }
    }

    /// Run one full fetch/recompute cycle
    ///
    /// Pulls every row through the pager, rebuilds the snapshot and stats,
    /// and overwrites the stored state wholesale. A partial or empty fetch
    /// degrades to a stale or empty display; it never fails the caller.
    pub async fn refresh<B: SignupBackend>(&self, pager: &mut SignupPager<B>) {
        let mut report = FetchReport::new();
        let rows = pager.fetch_all(&mut report).await;
        let now = Utc::now();

        let snapshot = Arc::new(SeriesSnapshot::from_rows(rows, now));
        let stats = snapshot.latest.and_then(|latest| {
            compute_stats(&snapshot.raw, latest, self.config.target_count, now)
        });
        let displayed = snapshot
            .latest
            .map(|latest| DisplayedCount::new(latest.count, latest.timestamp));

        if snapshot.is_empty() {
            debug!("fetch cycle returned no rows");
        }

        // Whole-value overwrites; an interleaved older cycle simply loses
        *self.series.write() = snapshot;
        *self.stats.write() = stats;
        *self.displayed.write() = displayed;
        *self.loading.write() = false;

        if !report.is_clean() {
            let message = report.errors.join("; ");
            warn!(
                partial = report.partial,
                truncated = report.truncated,
                "fetch cycle degraded: {message}"
            );
            self.event_bus
                .publish(CounterEvent::BackendError(message));
        }
        *self.last_report.write() = report;

        self.event_bus.publish(CounterEvent::SeriesRefreshed);
        if stats.is_some() {
            self.event_bus.publish(CounterEvent::StatsUpdated);
        }
    }

    /// Apply a push notification to the displayed count
    ///
    /// Reads the count from the new row, falling back to the old one for
    /// delete events. Malformed payloads are dropped without touching any
    /// state; this path never errors into the delivery mechanism. The
    /// stored series stays untouched - the next fetch cycle reconciles.
    pub fn apply_row_change(&self, change: &RowChangeEvent) {
        let Some(count) = change.count() else {
            trace!("ignoring row change without a usable count");
            return;
        };

        *self.displayed.write() = Some(DisplayedCount::new(count, Utc::now()));
        self.event_bus.publish(CounterEvent::CountUpdated(count));
    }

    /// Chart-ready buckets for a display range
    ///
    /// Filters the hourly view to the range cutoff, then resamples onto
    /// the adaptive bucket grid.
    pub fn chart(&self, range: DisplayRange, now: DateTime<Utc>) -> Vec<Bucket> {
        let snapshot = self.series.read().clone();
        match range.cutoff(now) {
            None => resample(&snapshot.hourly),
            Some(cutoff) => {
                let from = snapshot.hourly.partition_point(|s| s.timestamp < cutoff);
                resample(&snapshot.hourly[from..])
            }
        }
    }

    /// Interpolated count at an instant, for tooltip gap-filling
    pub fn interpolated_count(&self, t: DateTime<Utc>) -> f64 {
        let snapshot = self.series.read().clone();
        value_at(&snapshot.hourly, t)
    }

    pub fn series(&self) -> Arc<SeriesSnapshot> {
        self.series.read().clone()
    }

    pub fn stats(&self) -> Option<StatsSnapshot> {
        *self.stats.read()
    }

    pub fn displayed_count(&self) -> Option<DisplayedCount> {
        *self.displayed.read()
    }

    pub fn last_report(&self) -> FetchReport {
        self.last_report.read().clone()
    }

    /// True until the first fetch cycle completes
    pub fn is_loading(&self) -> bool {
        *self.loading.read()
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new(CounterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_default_config_constants() {
        let config = CounterConfig::default();
        assert_eq!(config.target_count, 5000);
        assert_eq!(
            config.launch_at,
            Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_store_starts_loading_and_empty() {
        let store = CounterStore::default();
        assert!(store.is_loading());
        assert!(store.stats().is_none());
        assert!(store.displayed_count().is_none());
        assert!(store.series().is_empty());
    }

    #[test]
    fn test_row_change_updates_displayed_count() {
        let store = CounterStore::default();
        let mut rx = store.event_bus().subscribe();

        store.apply_row_change(&RowChangeEvent {
            new: Some(json!({"count": "123"})),
            old: None,
        });

        assert_eq!(store.displayed_count().map(|d| d.count), Some(123));
        assert!(matches!(
            rx.try_recv(),
            Ok(CounterEvent::CountUpdated(123))
        ));
    }

    #[test]
    fn test_malformed_row_change_is_ignored() {
        let store = CounterStore::default();
        let mut rx = store.event_bus().subscribe();

        store.apply_row_change(&RowChangeEvent {
            new: Some(json!({"count": "abc"})),
            old: None,
        });
        store.apply_row_change(&RowChangeEvent::default());

        assert!(store.displayed_count().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_row_change_never_touches_series() {
        let store = CounterStore::default();
        let before = store.series();

        store.apply_row_change(&RowChangeEvent {
            new: Some(json!({"count": 77})),
            old: None,
        });

        assert!(Arc::ptr_eq(&before, &store.series()));
    }
}
