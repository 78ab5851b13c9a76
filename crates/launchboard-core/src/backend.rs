//! Backend seam for the signup table
//!
//! The remote store is a single table of (timestamp, count) rows, read
//! through keyset-paginated page queries and watched through a row-level
//! change feed. Both are abstracted behind `SignupBackend` so the engine
//! never carries transport concerns.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::BackendError;

/// One raw row from the signup table
///
/// `id` is present only when the backing table exposes an identifier
/// column; the pager probes for it once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRow {
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub count: i64,
}

impl SignupRow {
    pub fn new(id: Option<i64>, timestamp: DateTime<Utc>, count: i64) -> Self {
        Self {
            id,
            timestamp,
            count,
        }
    }
}

/// Ordering column for keyset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrder {
    /// `ORDER BY id ASC`, paged with `WHERE id > last_id`
    ById,
    /// `ORDER BY timestamp ASC`, paged with `WHERE timestamp > last_timestamp`
    ByTimestamp,
}

/// Exclusive lower bound for the next page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey {
    Id(i64),
    Timestamp(DateTime<Utc>),
}

/// One page query against the signup table
///
/// `SELECT [id,] timestamp, count FROM signups ORDER BY <order> ASC
/// LIMIT <limit> [WHERE <key> > <after>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub order: PageOrder,
    pub after: Option<PageKey>,
    pub limit: usize,
}

impl PageRequest {
    /// First page of a pass (no lower bound)
    pub fn first(order: PageOrder, limit: usize) -> Self {
        Self {
            order,
            after: None,
            limit,
        }
    }
}

/// A row-level change notification from the push subscription
///
/// Insert/update events carry `new`; delete events only carry `old`.
/// Rows arrive as loose JSON maps and are never trusted to be well-formed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowChangeEvent {
    #[serde(default)]
    pub new: Option<Value>,
    #[serde(default)]
    pub old: Option<Value>,
}

impl RowChangeEvent {
    /// Count carried by the change, reading `new` and falling back to `old`
    ///
    /// Returns `None` for any payload that does not yield a number; the
    /// caller drops such events without touching state.
    pub fn count(&self) -> Option<i64> {
        let row = self.new.as_ref().or(self.old.as_ref())?;
        coerce_count(row.get("count")?)
    }
}

/// Coerce a JSON count field to i64, accepting numeric strings
fn coerce_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Access to the remote signup table
///
/// Implementations live outside this crate (the display layer wires one
/// in). Returned futures are Send so the refresh loop can drive the
/// backend from a spawned task.
pub trait SignupBackend: Send + Sync {
    /// Execute one page query
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<SignupRow>, BackendError>> + Send;

    /// Open the row-level change feed
    ///
    /// The subscription is released by dropping the receiver.
    fn subscribe(
        &self,
    ) -> impl Future<Output = Result<mpsc::Receiver<RowChangeEvent>, BackendError>> + Send;
}
