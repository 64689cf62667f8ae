//! # Scheduler: batches handle notifications and delivers them on a later turn.
//!
//! ## Architecture
//! ```text
//! enqueue(particle, handle, kind, payload)
//!     │  push into ParticleQueues (particle → handle → FIFO)
//!     └─► schedule(): first enqueue since the last pass ─► Defer::defer(job)
//!
//! job (later turn):
//!     scheduled = false
//!     dispatch():
//!         loop {
//!             take_any() ─► (particle, buckets)        (removed from the live map)
//!             for bucket: for entry: handle.notify(..)  (isolated: Err / panic → log + event)
//!         } until the live map is empty
//!         IdleSlot::resolve()                           (wakes every is_idle() waiter)
//! ```
//!
//! ## Rules
//! - **FIFO per bucket**: one (particle, handle) pair sees entries in enqueue order.
//! - **No cross-particle order**: particles are drained in map order.
//! - **Batching**: any number of synchronous enqueues cost one deferred turn.
//! - **Re-entrancy**: `notify` may call `enqueue`; those entries land in a fresh
//!   bucket and are drained by the same pass.
//! - **Isolation**: a failing or panicking handle never stops the pass.
//! - **No cancellation**: an enqueued entry is always delivered (or its failure logged).
//!
//! The scheduler is `!Send`: every clone shares one `Rc`, and all calls must
//! happen on the single cooperative execution context driving [`Defer`].

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Arc;

use crate::core::builder::SchedulerBuilder;
use crate::core::config::Config;
use crate::core::defer::Defer;
use crate::core::idle::{IdleSignal, IdleSlot};
use crate::core::queue::{Bucket, ParticleQueues, QueueEntry};
use crate::error::DeliveryError;
use crate::events::{Bus, Event, EventKind};
use crate::handles::{Handle, HandleRef, NotifyKind, ParticleId, Payload};
use crate::subscribers::SubscriberSet;

/// Lifetime counters of one scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Entries accepted by `enqueue`.
    pub enqueued: u64,
    /// Entries whose `notify` returned `Ok`.
    pub delivered: u64,
    /// Entries whose `notify` returned `Err` or panicked.
    pub failed: u64,
    /// Deferred turns requested by `schedule`.
    pub scheduled: u64,
    /// Dispatch passes run to completion.
    pub passes: u64,
}

struct Inner {
    cfg: Config,
    label: Arc<str>,
    queues: RefCell<ParticleQueues>,
    scheduled: Cell<bool>,
    idle: RefCell<IdleSlot>,
    defer: Rc<dyn Defer>,
    bus: Option<Bus>,
    stats: Cell<SchedulerStats>,
    /// Keeps subscriber workers alive for the scheduler's lifetime.
    _subscribers: Option<Arc<SubscriberSet>>,
}

/// Batching notification scheduler. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<Inner>,
}

impl Scheduler {
    /// Creates a scheduler with the default [`Config`] and the given deferred-execution primitive.
    ///
    /// Events are enabled but nobody listens until [`bus`](Self::bus) is subscribed.
    pub fn new(defer: Rc<dyn Defer>) -> Self {
        SchedulerBuilder::new(Config::default())
            .with_defer(defer)
            .build()
    }

    /// Starts a [`SchedulerBuilder`].
    pub fn builder(cfg: Config) -> SchedulerBuilder {
        SchedulerBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: Config,
        defer: Rc<dyn Defer>,
        bus: Option<Bus>,
        subscribers: Option<Arc<SubscriberSet>>,
    ) -> Self {
        let label = Arc::from(cfg.label.as_ref());
        Self {
            inner: Rc::new(Inner {
                cfg,
                label,
                queues: RefCell::new(ParticleQueues::default()),
                scheduled: Cell::new(false),
                idle: RefCell::new(IdleSlot::Empty),
                defer,
                bus,
                stats: Cell::new(SchedulerStats::default()),
                _subscribers: subscribers,
            }),
        }
    }

    /// Queues one notification for `particle` on `handle` and requests a dispatch pass.
    ///
    /// Never fails and never delivers synchronously. `kind` must be non-empty.
    ///
    /// # Panics
    /// Only if the [`Defer`] primitive does: [`LocalDefer`](crate::LocalDefer)
    /// panics when the first enqueue of a burst happens outside a Tokio `LocalSet`.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    /// use proxy_scheduler::{HandleFn, HandleRef, ParticleId, Scheduler, TurnQueue};
    ///
    /// let turns = Rc::new(TurnQueue::new());
    /// let sched = Scheduler::new(turns.clone());
    /// let handle: HandleRef = HandleFn::rc("h", |_, _, _| Ok(()));
    ///
    /// sched.enqueue(ParticleId::next(), &handle, "sync", serde_json::json!({ "v": 1 }));
    /// assert!(sched.busy());
    ///
    /// turns.run_until_stalled();
    /// assert!(!sched.busy());
    /// ```
    pub fn enqueue(
        &self,
        particle: ParticleId,
        handle: &HandleRef,
        kind: impl Into<NotifyKind>,
        payload: Payload,
    ) {
        let kind = kind.into();
        debug_assert!(kind.is_valid(), "notification kind must be non-empty");

        tracing::trace!(
            scheduler = %self.inner.label,
            particle = particle.as_u64(),
            handle = handle.id().as_u64(),
            kind = kind.as_str(),
            "enqueue"
        );

        self.inner.queues.borrow_mut().push(
            particle,
            handle,
            QueueEntry {
                kind,
                particle,
                payload,
            },
        );
        self.bump(|s| s.enqueued += 1);
        self.schedule();
    }

    /// Returns `true` while any entry is queued.
    pub fn busy(&self) -> bool {
        !self.inner.queues.borrow().is_empty()
    }

    /// Returns a signal that resolves once nothing is queued.
    ///
    /// - Not busy: an already-resolved signal (no deferred turn needed).
    /// - Busy: the single outstanding signal of this busy period; repeated calls
    ///   return clones of it ([`IdleSignal::same_signal`]).
    pub fn is_idle(&self) -> IdleSignal {
        if !self.busy() {
            return IdleSignal::ready();
        }
        self.inner.idle.borrow_mut().get_or_create()
    }

    /// Number of queued entries across all particles and handles.
    pub fn len(&self) -> usize {
        self.inner.queues.borrow().len()
    }

    /// Returns `true` if nothing is queued. Same as `!busy()`.
    pub fn is_empty(&self) -> bool {
        !self.busy()
    }

    /// Number of queued entries for one particle.
    pub fn pending_for(&self, particle: ParticleId) -> usize {
        self.inner.queues.borrow().len_for(particle)
    }

    /// Snapshot of the lifetime counters.
    pub fn stats(&self) -> SchedulerStats {
        self.inner.stats.get()
    }

    /// Label from [`Config::label`].
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Event bus, if events are enabled ([`Config::bus_capacity`] > 0).
    pub fn bus(&self) -> Option<&Bus> {
        self.inner.bus.as_ref()
    }

    /// Requests one deferred dispatch pass unless one is already pending.
    fn schedule(&self) {
        if self.inner.scheduled.replace(true) {
            return;
        }
        self.bump(|s| s.scheduled += 1);
        self.publish(|| Event::new(EventKind::DispatchScheduled));

        let this = self.clone();
        self.inner.defer.defer(Box::new(move || {
            this.inner.scheduled.set(false);
            this.dispatch();
        }));
    }

    /// Drains the live queue structure until it is empty, then resolves idle waiters.
    fn dispatch(&self) {
        tracing::debug!(
            scheduler = %self.inner.label,
            particles = self.inner.queues.borrow().particle_count(),
            entries = self.len(),
            "dispatch pass started"
        );
        self.publish(|| Event::new(EventKind::DispatchStarted));

        let mut delivered = 0u64;
        let mut failed = 0u64;

        loop {
            // Borrow released before any notify runs.
            let next = self.inner.queues.borrow_mut().take_any();
            let Some((particle, buckets)) = next else {
                break;
            };

            for (_, Bucket { handle, entries }) in buckets {
                for entry in entries {
                    match deliver(&handle, &entry) {
                        Ok(()) => delivered += 1,
                        Err(err) => {
                            failed += 1;
                            self.report_failure(particle, &handle, &entry, &err);
                        }
                    }
                }
            }
        }

        self.bump(|s| {
            s.delivered += delivered;
            s.failed += failed;
            s.passes += 1;
        });
        tracing::debug!(
            scheduler = %self.inner.label,
            delivered,
            failed,
            "dispatch pass finished"
        );
        self.publish(|| Event::new(EventKind::DispatchFinished).with_counts(delivered, failed));

        let resolved = self.inner.idle.borrow_mut().resolve();
        if resolved {
            tracing::debug!(scheduler = %self.inner.label, "idle");
            self.publish(|| Event::new(EventKind::IdleResolved));
        }
    }

    fn report_failure(
        &self,
        particle: ParticleId,
        handle: &HandleRef,
        entry: &QueueEntry,
        err: &DeliveryError,
    ) {
        if self.inner.cfg.warn_on_failure {
            tracing::warn!(
                scheduler = %self.inner.label,
                particle = particle.as_u64(),
                handle = handle.name(),
                kind = entry.kind.as_str(),
                label = err.as_label(),
                "error dispatching to particle: {err}"
            );
        } else {
            tracing::debug!(
                scheduler = %self.inner.label,
                particle = particle.as_u64(),
                handle = handle.name(),
                kind = entry.kind.as_str(),
                label = err.as_label(),
                "error dispatching to particle: {err}"
            );
        }

        self.publish(|| {
            Event::new(EventKind::DeliveryFailed)
                .with_particle(particle)
                .with_handle(handle.id())
                .with_notify_kind(&entry.kind)
                .with_reason(err.as_message())
        });
    }

    /// Publishes an event tagged with this scheduler's label, if events are enabled.
    fn publish(&self, make: impl FnOnce() -> Event) {
        if let Some(bus) = &self.inner.bus {
            bus.publish(make().with_scheduler(Arc::clone(&self.inner.label)));
        }
    }

    fn bump(&self, f: impl FnOnce(&mut SchedulerStats)) {
        let mut stats = self.inner.stats.get();
        f(&mut stats);
        self.inner.stats.set(stats);
    }
}

/// Calls `notify`, turning a panic into [`DeliveryError::Panicked`].
fn deliver(handle: &HandleRef, entry: &QueueEntry) -> Result<(), DeliveryError> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        handle.notify(&entry.kind, entry.particle, &entry.payload)
    }))
    .unwrap_or_else(|payload| Err(DeliveryError::from_panic(&*payload)))
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("label", &self.inner.label)
            .field("queued", &self.len())
            .field("scheduled", &self.inner.scheduled.get())
            .field("idle_pending", &self.inner.idle.borrow().is_pending())
            .field("stats", &self.inner.stats.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defer::{LocalDefer, TurnQueue};
    use crate::handles::{HandleFn, HandleId};
    use futures::FutureExt;
    use serde_json::json;
    use std::rc::Weak;

    type Log = Rc<RefCell<Vec<(String, ParticleId, Payload)>>>;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("proxy_scheduler=trace")
            .try_init();
    }

    fn quiet(turns: &Rc<TurnQueue>) -> Scheduler {
        Scheduler::builder(Config {
            bus_capacity: 0,
            ..Config::labeled("test")
        })
        .with_defer(turns.clone())
        .build()
    }

    fn recorder(name: &'static str) -> (HandleRef, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let handle: HandleRef = HandleFn::rc(name, move |kind, particle, payload| {
            sink.borrow_mut()
                .push((kind.to_string(), particle, payload.clone()));
            Ok(())
        });
        (handle, log)
    }

    /// Handle that re-enqueues `{v: 3}` to itself the first time it sees `{v: 1}`.
    struct Echo {
        id: HandleId,
        sched: Scheduler,
        me: Weak<Echo>,
        log: Log,
    }

    impl Handle for Echo {
        fn id(&self) -> HandleId {
            self.id
        }

        fn notify(
            &self,
            kind: &NotifyKind,
            particle: ParticleId,
            payload: &Payload,
        ) -> Result<(), DeliveryError> {
            self.log
                .borrow_mut()
                .push((kind.to_string(), particle, payload.clone()));
            if payload["v"] == 1 {
                if let Some(me) = self.me.upgrade() {
                    let me: HandleRef = me;
                    self.sched.enqueue(particle, &me, "sync", json!({ "v": 3 }));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_scenario_a_fifo_within_bucket() {
        init_tracing();
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let (h1, log) = recorder("h1");
        let p1 = ParticleId::next();

        sched.enqueue(p1, &h1, "sync", json!({ "v": 1 }));
        sched.enqueue(p1, &h1, "sync", json!({ "v": 2 }));
        assert!(log.borrow().is_empty());

        turns.run_until_stalled();
        assert_eq!(
            *log.borrow(),
            vec![
                ("sync".to_string(), p1, json!({ "v": 1 })),
                ("sync".to_string(), p1, json!({ "v": 2 })),
            ]
        );
    }

    #[test]
    fn test_fifo_holds_for_long_runs_across_handles() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let (h1, log1) = recorder("h1");
        let (h2, log2) = recorder("h2");
        let p1 = ParticleId::next();
        let p2 = ParticleId::next();

        for v in 0..50 {
            sched.enqueue(p1, &h1, "update", json!({ "v": v }));
            sched.enqueue(p2, &h2, "update", json!({ "v": v }));
            sched.enqueue(p1, &h2, "update", json!({ "v": v + 100 }));
        }
        turns.run_until_stalled();

        let values = |log: &Log, p: ParticleId| -> Vec<i64> {
            log.borrow()
                .iter()
                .filter(|(_, particle, _)| *particle == p)
                .map(|(_, _, payload)| payload["v"].as_i64().unwrap())
                .collect()
        };
        assert_eq!(values(&log1, p1), (0..50).collect::<Vec<_>>());
        assert_eq!(values(&log2, p2), (0..50).collect::<Vec<_>>());
        assert_eq!(values(&log2, p1), (100..150).collect::<Vec<_>>());
        assert_eq!(sched.stats().delivered, 150);
    }

    #[test]
    fn test_scenario_b_busy_until_drained() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let (h1, _) = recorder("h1");
        let (h2, _) = recorder("h2");
        let p1 = ParticleId::next();
        let p2 = ParticleId::next();

        sched.enqueue(p1, &h1, "update", Payload::Null);
        sched.enqueue(p2, &h2, "update", Payload::Null);
        assert!(sched.busy());
        assert_eq!(sched.len(), 2);
        assert_eq!(sched.pending_for(p1), 1);

        let idle = sched.is_idle();
        assert!(!idle.is_resolved());

        turns.run_until_stalled();
        assert!(!sched.busy());
        assert_eq!(sched.len(), 0);
        assert_eq!(idle.now_or_never(), Some(()));
    }

    #[test]
    fn test_scenario_c_reentrant_enqueue_drains_in_same_pass() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let echo = Rc::new_cyclic(|me| Echo {
            id: HandleId::next(),
            sched: sched.clone(),
            me: me.clone(),
            log: Rc::clone(&log),
        });
        let h1: HandleRef = echo;
        let p1 = ParticleId::next();

        sched.enqueue(p1, &h1, "sync", json!({ "v": 1 }));
        sched.enqueue(p1, &h1, "sync", json!({ "v": 2 }));
        let idle = sched.is_idle();

        // A single turn delivers v:1, v:2 and the re-entrant v:3.
        assert!(turns.run_next());
        let values: Vec<_> = log.borrow().iter().map(|(_, _, p)| p["v"].clone()).collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
        assert!(!sched.busy());
        assert!(idle.is_resolved());

        // The re-entrant enqueue requested one more (empty) pass.
        assert_eq!(turns.run_until_stalled(), 1);
        assert_eq!(sched.stats().passes, 2);
        assert_eq!(sched.stats().delivered, 3);
    }

    #[test]
    fn test_reentrant_enqueue_for_other_particle_drains_in_same_pass() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let (sink, sink_log) = recorder("sink");
        let target = ParticleId::next();

        let downstream = sched.clone();
        let forward: HandleRef = HandleFn::rc("forward", move |kind, _, payload| {
            downstream.enqueue(target, &sink, kind.clone(), payload.clone());
            Ok(())
        });
        let source = ParticleId::next();
        sched.enqueue(source, &forward, "update", json!({ "v": 7 }));
        let idle = sched.is_idle();

        assert!(turns.run_next());
        assert_eq!(
            *sink_log.borrow(),
            vec![("update".to_string(), target, json!({ "v": 7 }))]
        );
        assert!(!sched.busy());
        assert!(idle.is_resolved());
        assert_eq!(sched.stats().delivered, 2);

        assert_eq!(turns.run_until_stalled(), 1);
        assert_eq!(sink_log.borrow().len(), 1);
    }

    #[test]
    fn test_is_idle_inside_last_notify_is_ready() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let seen = Rc::new(Cell::new(None));

        let inner = sched.clone();
        let flag = Rc::clone(&seen);
        let handle: HandleRef = HandleFn::rc("checks-idle", move |_, _, _| {
            flag.set(Some((inner.busy(), inner.is_idle().is_resolved())));
            Ok(())
        });
        sched.enqueue(ParticleId::next(), &handle, "sync", Payload::Null);
        let outside = sched.is_idle();

        turns.run_until_stalled();
        assert_eq!(seen.get(), Some((false, true)));
        assert!(outside.is_resolved());
    }

    #[test]
    fn test_discarded_turn_releases_idle_waiters() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let (h1, log) = recorder("h1");

        sched.enqueue(ParticleId::next(), &h1, "update", Payload::Null);
        let idle = sched.is_idle();
        drop(sched);
        assert!(!idle.is_resolved());

        assert_eq!(turns.discard(), 1);
        assert!(idle.is_resolved());
        assert!(log.borrow().is_empty());
    }

    #[test]
    #[should_panic]
    fn test_local_defer_outside_local_set_panics_on_enqueue() {
        let sched = Scheduler::builder(Config::labeled("no-local-set")).build();
        let (h1, _) = recorder("h1");
        sched.enqueue(ParticleId::next(), &h1, "sync", Payload::Null);
    }

    #[test]
    fn test_scenario_d_idle_when_empty_needs_no_turn() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);

        let idle = sched.is_idle();
        assert_eq!(idle.now_or_never(), Some(()));
        assert_eq!(turns.pending(), 0);
        assert_eq!(sched.stats(), SchedulerStats::default());
    }

    #[test]
    fn test_idle_signal_is_shared_within_busy_period() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let (h1, _) = recorder("h1");
        let p1 = ParticleId::next();

        sched.enqueue(p1, &h1, "update", Payload::Null);
        let a = sched.is_idle();
        let b = sched.is_idle();
        assert!(a.same_signal(&b));
        assert!(!a.is_resolved());

        turns.run_until_stalled();
        assert!(a.is_resolved());
        assert!(b.is_resolved());

        sched.enqueue(p1, &h1, "update", Payload::Null);
        let c = sched.is_idle();
        assert!(!c.same_signal(&a));
        assert!(!c.is_resolved());
        turns.run_until_stalled();
        assert!(c.is_resolved());
    }

    #[test]
    fn test_failures_are_isolated() {
        init_tracing();
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let (good, log) = recorder("good");
        let failing: HandleRef = HandleFn::rc("failing", |_, _, payload| {
            if payload["v"] == 1 {
                Err(DeliveryError::fail("rejected"))
            } else {
                Ok(())
            }
        });
        let panicking: HandleRef = HandleFn::rc("panicking", |_, _, _| panic!("handle blew up"));
        let p1 = ParticleId::next();
        let p2 = ParticleId::next();

        sched.enqueue(p1, &failing, "update", json!({ "v": 1 }));
        sched.enqueue(p1, &failing, "update", json!({ "v": 2 }));
        sched.enqueue(p1, &panicking, "update", Payload::Null);
        sched.enqueue(p1, &good, "update", json!({ "v": 10 }));
        sched.enqueue(p2, &panicking, "update", Payload::Null);
        sched.enqueue(p2, &good, "update", json!({ "v": 20 }));
        let idle = sched.is_idle();

        assert_eq!(turns.run_until_stalled(), 1);
        assert!(idle.is_resolved());
        assert_eq!(log.borrow().len(), 2);

        let stats = sched.stats();
        assert_eq!(stats.enqueued, 6);
        assert_eq!(stats.delivered, 3);
        assert_eq!(stats.failed, 3);

        // Still accepting work after failures.
        sched.enqueue(p1, &good, "update", json!({ "v": 30 }));
        turns.run_until_stalled();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_burst_costs_one_turn() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        let (h1, log) = recorder("h1");

        for v in 0..100 {
            sched.enqueue(ParticleId::from_raw(v % 7), &h1, "update", json!({ "v": v }));
        }
        assert_eq!(turns.pending(), 1);
        assert_eq!(sched.stats().scheduled, 1);

        assert_eq!(turns.run_until_stalled(), 1);
        assert_eq!(log.borrow().len(), 100);
        assert_eq!(sched.stats().passes, 1);

        // Work after the pass schedules a fresh turn.
        sched.enqueue(ParticleId::from_raw(0), &h1, "update", Payload::Null);
        assert_eq!(turns.pending(), 1);
        assert_eq!(sched.stats().scheduled, 2);
    }

    #[test]
    fn test_events_trace_a_pass() {
        let turns = Rc::new(TurnQueue::new());
        let sched = Scheduler::builder(Config::labeled("arc-1"))
            .with_defer(turns.clone())
            .build();
        let mut rx = sched.bus().expect("events enabled").subscribe();
        let failing: HandleRef = HandleFn::rc("failing", |_, _, _| Err(DeliveryError::fail("nope")));
        let p1 = ParticleId::next();

        sched.enqueue(p1, &failing, "desync", Payload::Null);
        let _idle = sched.is_idle();
        turns.run_until_stalled();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.scheduler.as_deref(), Some("arc-1"));
            if ev.is_delivery_failure() {
                assert_eq!(ev.particle, Some(p1));
                assert_eq!(ev.handle, Some(failing.id()));
                assert_eq!(ev.notify_kind.as_deref(), Some("desync"));
                assert_eq!(ev.reason.as_deref(), Some("error: nope"));
            }
            if ev.kind == EventKind::DispatchFinished {
                assert_eq!((ev.delivered, ev.failed), (Some(0), Some(1)));
            }
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::DispatchScheduled,
                EventKind::DispatchStarted,
                EventKind::DeliveryFailed,
                EventKind::DispatchFinished,
                EventKind::IdleResolved,
            ]
        );
    }

    #[test]
    fn test_quiet_config_has_no_bus() {
        let turns = Rc::new(TurnQueue::new());
        let sched = quiet(&turns);
        assert!(sched.bus().is_none());
        assert_eq!(sched.label(), "test");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_local_defer_drains_and_resolves_idle() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let sched = Scheduler::new(Rc::new(LocalDefer));
                let (h1, log) = recorder("h1");
                let p1 = ParticleId::next();

                sched.enqueue(p1, &h1, "sync", json!({ "v": 1 }));
                sched.enqueue(p1, &h1, "update", json!({ "v": 2 }));
                assert!(log.borrow().is_empty());

                sched.is_idle().await;
                assert!(!sched.busy());
                assert_eq!(log.borrow().len(), 2);
                assert_eq!(log.borrow()[1].0, "update");
            })
            .await;
    }
}
