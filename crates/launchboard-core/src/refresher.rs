//! Periodic refresh loop and push-event delivery
//!
//! One spawned task owns the pager and the push subscription: a 60s timer
//! drives full fetch cycles, push events patch the displayed count in
//! between, and a shutdown channel tears both down together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::backend::{RowChangeEvent, SignupBackend};
use crate::pager::SignupPager;
use crate::store::CounterStore;

/// Configuration for the refresh loop
#[derive(Debug, Clone)]
pub struct RefresherConfig {
    /// Interval between full fetch cycles
    pub refresh_interval: Duration,
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
        }
    }
}

/// Handle to the running refresh loop
///
/// Dropping the handle leaves the loop running; call `stop` to tear it
/// down. The timer and the push subscription both die with the task.
pub struct Refresher {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Refresher {
    /// Spawn the refresh loop
    ///
    /// The first fetch cycle runs immediately. Ticks that land while a
    /// cycle is still in flight are skipped, so cycles never overlap. A
    /// failed subscription degrades to timer-only refresh.
    pub fn start<B>(backend: B, store: Arc<CounterStore>, config: RefresherConfig) -> Self
    where
        B: SignupBackend + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            let mut push_rx = match backend.subscribe().await {
                Ok(rx) => Some(rx),
                Err(e) => {
                    warn!(error = %e, "push subscription unavailable, timer-only refresh");
                    None
                }
            };
            let mut pager = SignupPager::new(backend);

            let mut ticker = tokio::time::interval(config.refresh_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(
                interval_secs = config.refresh_interval.as_secs(),
                live = push_rx.is_some(),
                "refresh loop started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        store.refresh(&mut pager).await;
                    }
                    event = recv_push(&mut push_rx) => {
                        match event {
                            Some(change) => store.apply_row_change(&change),
                            None => {
                                debug!("push feed closed, timer-only refresh");
                                push_rx = None;
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("refresh loop shutting down");
                        break;
                    }
                }
            }
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Stop the loop and wait for the task to finish
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.handle.await;
    }
}

/// Receive from the push feed, parking forever once it is gone
async fn recv_push(
    rx: &mut Option<mpsc::Receiver<RowChangeEvent>>,
) -> Option<RowChangeEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
