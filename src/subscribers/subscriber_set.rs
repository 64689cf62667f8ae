//! # Non-blocking event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`] - distributes scheduler events to multiple
//! subscribers concurrently without blocking the dispatch pass.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     ├──► [queue 2] ──► worker 2 ──► subscriber2.on_event()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - Each subscriber sees events in publish order; there is no ordering across subscribers.
//! - `emit` never waits. A full lane drops the event for that subscriber only.
//! - A panic inside `on_event` is caught and reported as `SubscriberPanicked`;
//!   the worker keeps draining its lane.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};

use crate::error::panic_message;
use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Bounded queue feeding one subscriber's worker.
struct Lane {
    subscriber: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Fan-out of scheduler events to a fixed list of subscribers.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    tasks: Vec<JoinHandle<()>>,
    bus: Bus,
}

/// Drains one lane until its sender is dropped.
async fn drain(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(event) = rx.recv().await {
        let call = std::panic::AssertUnwindSafe(sub.on_event(&event));
        if let Err(payload) = call.catch_unwind().await {
            bus.publish(Event::subscriber_panicked(
                sub.name(),
                panic_message(&*payload),
            ));
        }
    }
}

impl SubscriberSet {
    /// Spawns one worker per subscriber.
    ///
    /// Needs a running Tokio runtime. Queue capacities below 1 are raised to 1.
    #[must_use]
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let (lanes, tasks) = subscribers
            .into_iter()
            .map(|sub| {
                let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
                let lane = Lane {
                    subscriber: sub.name(),
                    tx,
                };
                (lane, tokio::spawn(drain(sub, rx, bus.clone())))
            })
            .unzip();
        Self { lanes, tasks, bus }
    }

    /// Number of subscribers in the set.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Returns `true` if the set has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Queues a copy of `event` for every subscriber.
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Queues `event` for every subscriber without waiting.
    ///
    /// A full or closed lane drops the event for that subscriber and publishes
    /// `SubscriberOverflow`, unless the dropped event is itself an overflow report.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let report = !event.is_subscriber_overflow();
        for lane in &self.lanes {
            let reason = match lane.tx.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if report {
                self.bus
                    .publish(Event::subscriber_overflow(lane.subscriber, reason));
            }
        }
    }

    /// Subscribes to the bus and forwards every event to this set.
    ///
    /// The listener only holds a weak reference: once the last `Arc` to the
    /// set is dropped, its lanes close, the workers finish what is queued and
    /// the listener exits on the next event or when every bus sender is gone.
    /// Lagged receivers skip the missed events and keep going.
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let set = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => match set.upgrade() {
                        Some(set) => set.emit_arc(Arc::new(event)),
                        None => break,
                    },
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::debug!(missed, "subscriber listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Closes every lane and waits for the workers to drain what is queued.
    ///
    /// Dropping the set closes the lanes too, without waiting.
    pub async fn shutdown(self) {
        let Self { lanes, tasks, .. } = self;
        drop(lanes);
        for task in tasks {
            if let Err(err) = task.await {
                tracing::debug!(error = %err, "subscriber worker ended abnormally");
            }
        }
    }
}
