//! # Event bus.
//!
//! [`Bus`] wraps a [`tokio::sync::broadcast`] sender. Schedulers and
//! subscriber workers publish into it; a [`SubscriberSet`](crate::SubscriberSet)
//! listener or any other receiver reads from it.
//!
//! ```text
//! Scheduler::schedule / dispatch ──┐
//!                                  ├──► Bus ──► receivers
//! SubscriberSet workers ───────────┘
//! ```
//!
//! Publishing never waits. Events sent while nobody listens are lost, and a
//! receiver that falls more than `capacity` events behind skips the oldest ones.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable handle to one broadcast channel of [`Event`]s.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Opens a channel buffering up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `event` to every live receiver.
    pub fn publish(&self, event: Event) {
        // Err only means there is no receiver right now.
        let _ = self.tx.send(event);
    }

    /// Returns a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers, including subscriber listeners.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::IdleResolved));
        assert_eq!(bus.receiver_count(), 0);
    }

    #[test]
    fn test_receiver_sees_events_after_subscribe() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::DispatchStarted));
        bus.publish(Event::new(EventKind::DispatchFinished));

        assert_eq!(rx.try_recv().unwrap().kind, EventKind::DispatchStarted);
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::DispatchFinished);
        assert!(rx.try_recv().is_err());
    }
}
