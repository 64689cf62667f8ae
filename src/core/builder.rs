use std::rc::Rc;
use std::sync::Arc;

use crate::core::{config::Config, defer::Defer, defer::LocalDefer, scheduler::Scheduler};
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a [`Scheduler`] with optional features.
pub struct SchedulerBuilder {
    cfg: Config,
    defer: Option<Rc<dyn Defer>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            defer: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the deferred-execution primitive.
    ///
    /// Defaults to [`LocalDefer`] (requires a Tokio `LocalSet`).
    pub fn with_defer(mut self, defer: Rc<dyn Defer>) -> Self {
        self.defer = Some(defer);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive scheduler events through dedicated workers with
    /// bounded queues. Ignored when events are disabled (`bus_capacity = 0`).
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds and returns the scheduler.
    ///
    /// Initializes:
    /// - Event bus (unless disabled by config)
    /// - Subscriber workers and the bus listener (only when subscribers were given).
    ///   They live as long as the scheduler or any of its clones.
    ///
    /// # Panics
    /// Panics when subscribers were given and no Tokio runtime is running.
    /// Without [`with_defer`](Self::with_defer) the scheduler uses [`LocalDefer`],
    /// and its first `enqueue` then panics outside a Tokio `LocalSet`.
    pub fn build(self) -> Scheduler {
        let bus = self.cfg.event_capacity().map(Bus::new);

        let subscribers = match &bus {
            Some(bus) if !self.subscribers.is_empty() => {
                let set = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
                set.spawn_listener();
                Some(set)
            }
            Some(_) => None,
            None => {
                if !self.subscribers.is_empty() {
                    tracing::warn!(
                        scheduler = %self.cfg.label,
                        count = self.subscribers.len(),
                        "events disabled (bus_capacity = 0); subscribers ignored"
                    );
                }
                None
            }
        };

        let defer = self.defer.unwrap_or_else(|| Rc::new(LocalDefer));
        Scheduler::from_parts(self.cfg, defer, bus, subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defer::TurnQueue;
    use crate::events::{Event, EventKind};
    use crate::handles::{HandleFn, HandleRef, ParticleId, Payload};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct Collect {
        kinds: Arc<Mutex<Vec<EventKind>>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
        }
        fn name(&self) -> &'static str {
            "collect"
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_subscribers_observe_dispatch() {
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Collect {
            kinds: Arc::clone(&kinds),
        })];
        let turns = Rc::new(TurnQueue::new());
        let sched = SchedulerBuilder::new(Config::labeled("observed"))
            .with_defer(turns.clone())
            .with_subscribers(subs)
            .build();
        let handle: HandleRef = HandleFn::rc("h", |_, _, _| Ok(()));

        // Let the listener task subscribe before anything is published.
        tokio::task::yield_now().await;

        sched.enqueue(ParticleId::next(), &handle, "sync", Payload::Null);
        turns.run_until_stalled();

        for _ in 0..50 {
            if kinds.lock().unwrap().len() >= 3 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(
            *kinds.lock().unwrap(),
            vec![
                EventKind::DispatchScheduled,
                EventKind::DispatchStarted,
                EventKind::DispatchFinished,
            ]
        );
    }

    #[test]
    fn test_disabled_events_drop_subscribers() {
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Collect {
            kinds: Arc::new(Mutex::new(Vec::new())),
        })];
        let sched = SchedulerBuilder::new(Config {
            bus_capacity: 0,
            ..Config::default()
        })
        .with_defer(Rc::new(TurnQueue::new()))
        .with_subscribers(subs)
        .build();
        assert!(sched.bus().is_none());
    }

    struct Watched {
        dropped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Subscribe for Watched {
        async fn on_event(&self, _event: &Event) {}
        fn name(&self) -> &'static str {
            "watched"
        }
    }

    impl Drop for Watched {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_dropping_scheduler_releases_subscribers() {
        let dropped = Arc::new(AtomicBool::new(false));
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Watched {
            dropped: Arc::clone(&dropped),
        })];
        let turns = Rc::new(TurnQueue::new());
        let sched = SchedulerBuilder::new(Config::labeled("short-lived"))
            .with_defer(turns.clone())
            .with_subscribers(subs)
            .build();
        let handle: HandleRef = HandleFn::rc("h", |_, _, _| Ok(()));

        sched.enqueue(ParticleId::next(), &handle, "update", Payload::Null);
        turns.run_until_stalled();
        tokio::task::yield_now().await;
        assert!(!dropped.load(Ordering::SeqCst));

        drop(sched);
        for _ in 0..200 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }
}
