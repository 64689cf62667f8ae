//! # Dispatch lifecycle events.
//!
//! Schedulers publish an [`Event`] when a turn is requested, when a pass
//! starts and finishes, when a delivery fails and when an idle signal fires.
//! Subscriber workers add overflow and panic reports.
//!
//! `seq` is taken from one process-wide counter, so events from several
//! schedulers can be merged back into publish order.
//!
//! ## Example
//! ```rust
//! use proxy_scheduler::{Event, EventKind, HandleId, NotifyKind, ParticleId};
//!
//! let ev = Event::new(EventKind::DeliveryFailed)
//!     .with_scheduler("arc-1")
//!     .with_particle(ParticleId::from_raw(4))
//!     .with_handle(HandleId::from_raw(9))
//!     .with_notify_kind(&NotifyKind::Update)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::DeliveryFailed);
//! assert_eq!(ev.scheduler.as_deref(), Some("arc-1"));
//! assert_eq!(ev.notify_kind.as_deref(), Some("update"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::handles::{HandleId, NotifyKind, ParticleId};

static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// What an [`Event`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The first enqueue of a burst requested a deferred turn.
    DispatchScheduled,
    /// A deferred pass began draining the queue.
    DispatchStarted,
    /// A pass left the queue empty. Carries `delivered` and `failed` for that pass.
    DispatchFinished,
    /// `notify` returned an error or panicked.
    /// Carries `particle`, `handle`, `notify_kind` and the failure text in `reason`.
    DeliveryFailed,
    /// The pending idle signal of a scheduler fired.
    IdleResolved,
    /// A subscriber lane dropped an event; `reason` says whether it was full or closed.
    SubscriberOverflow,
    /// `Subscribe::on_event` panicked; `reason` holds the panic message.
    SubscriberPanicked,
}

/// One observation published on the [`Bus`](crate::events::Bus).
///
/// Fields other than `seq`, `at` and `kind` are filled in only when they
/// apply to the kind. Scheduler events always carry `scheduler`.
#[derive(Clone, Debug)]
pub struct Event {
    /// Process-wide publish order.
    pub seq: u64,
    /// Wall-clock time of creation.
    pub at: SystemTime,
    /// What happened.
    pub kind: EventKind,

    /// Label of the publishing scheduler.
    pub scheduler: Option<Arc<str>>,
    /// Subscriber name, for overflow and panic reports.
    pub subscriber: Option<Arc<str>>,
    /// Target particle of a failed delivery.
    pub particle: Option<ParticleId>,
    /// Handle of a failed delivery.
    pub handle: Option<HandleId>,
    /// Tag of the failed entry.
    pub notify_kind: Option<Arc<str>>,
    /// Successful deliveries in the finished pass.
    pub delivered: Option<u64>,
    /// Failed deliveries in the finished pass.
    pub failed: Option<u64>,
    /// Failure text, panic message or overflow detail.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Stamps a new event with the next `seq` and the current time.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            scheduler: None,
            subscriber: None,
            particle: None,
            handle: None,
            notify_kind: None,
            delivered: None,
            failed: None,
            reason: None,
        }
    }

    /// Attaches the emitting scheduler's label.
    #[inline]
    pub fn with_scheduler(mut self, label: impl Into<Arc<str>>) -> Self {
        self.scheduler = Some(label.into());
        self
    }

    /// Attaches a particle id.
    #[inline]
    pub fn with_particle(mut self, particle: ParticleId) -> Self {
        self.particle = Some(particle);
        self
    }

    /// Attaches a handle id.
    #[inline]
    pub fn with_handle(mut self, handle: HandleId) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Attaches a notification tag.
    #[inline]
    pub fn with_notify_kind(mut self, kind: &NotifyKind) -> Self {
        self.notify_kind = Some(Arc::from(kind.as_str()));
        self
    }

    /// Attaches per-pass delivery counters.
    #[inline]
    pub fn with_counts(mut self, delivered: u64, failed: u64) -> Self {
        self.delivered = Some(delivered);
        self.failed = Some(failed);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    fn for_subscriber(kind: EventKind, subscriber: &str, reason: String) -> Self {
        Self {
            subscriber: Some(Arc::from(subscriber)),
            ..Event::new(kind).with_reason(reason)
        }
    }

    /// Report of an event dropped for `subscriber` (`reason` is "full" or "closed").
    pub fn subscriber_overflow(subscriber: &str, reason: &str) -> Self {
        Self::for_subscriber(
            EventKind::SubscriberOverflow,
            subscriber,
            format!("subscriber={subscriber} reason={reason}"),
        )
    }

    /// Report of a panic inside `subscriber`'s `on_event`.
    pub fn subscriber_panicked(subscriber: &str, info: String) -> Self {
        Self::for_subscriber(EventKind::SubscriberPanicked, subscriber, info)
    }

    /// Returns `true` for [`EventKind::SubscriberOverflow`].
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// Returns `true` for [`EventKind::DeliveryFailed`].
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self.kind, EventKind::DeliveryFailed)
    }
}
