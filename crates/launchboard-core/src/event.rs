//! Event bus for launchboard using tokio::broadcast
//!
//! Provides a publish-subscribe mechanism for counter updates.

use tokio::sync::broadcast;

/// Events emitted by the counter engine
#[derive(Debug, Clone)]
pub enum CounterEvent {
    /// A fetch cycle replaced the series snapshot
    SeriesRefreshed,
    /// Trend statistics were recomputed
    StatsUpdated,
    /// A push event changed the displayed count
    CountUpdated(i64),
    /// The backend reported an error during a fetch cycle
    BackendError(String),
}

/// Event bus for broadcasting counter events
///
/// Uses tokio::broadcast for multi-consumer support. The display layer
/// subscribes for redraw triggers.
pub struct EventBus {
    sender: broadcast::Sender<CounterEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (256 events)
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: CounterEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<CounterEvent> {
        self.sender.subscribe()
    }

    /// Get current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
