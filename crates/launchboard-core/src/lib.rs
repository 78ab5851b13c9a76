//! launchboard-core - Core library for launchboard
//!
//! Time-series engine behind the signup counter: keyset-paginated ingestion,
//! hourly downsampling, adaptive resampling, interpolation, and trend stats.

pub mod analytics;
pub mod backend;
pub mod error;
pub mod event;
pub mod models;
pub mod pager;
pub mod refresher;
pub mod store;

pub use backend::{PageKey, PageOrder, PageRequest, RowChangeEvent, SignupBackend, SignupRow};
pub use error::{BackendError, FetchReport};
pub use event::{CounterEvent, EventBus};
pub use models::{Bucket, DisplayedCount, Sample, SeriesSnapshot, StatsSnapshot};
pub use pager::SignupPager;
pub use refresher::{Refresher, RefresherConfig};
pub use store::{CounterConfig, CounterStore};
