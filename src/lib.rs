//! # proxy-scheduler
//!
//! **proxy-scheduler** batches notifications from data handles to the
//! particles observing them, and delivers them on a later turn of a
//! single-threaded event loop.
//!
//! Producers (typically a storage layer applying an update) call
//! [`Scheduler::enqueue`] synchronously, as often as they like. The scheduler
//! coalesces the burst into one deferred dispatch pass, delivers every entry
//! grouped by particle and handle, and resolves [`Scheduler::is_idle`] waiters
//! once nothing is left.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   storage / producers (synchronous)
//!     │ enqueue(particle, handle, kind, payload)   × N
//!     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler                                                        │
//! │  - ParticleQueues  (particle → handle → FIFO bucket)              │
//! │  - scheduled flag  (one deferred turn per burst)                  │
//! │  - IdleSlot        (at most one pending IdleSignal)               │
//! │  - Bus             (optional event broadcast)                     │
//! └──────┬───────────────────────────────────────────┬────────────────┘
//!        │ Defer::defer(job)                         │ publish(Event)
//!        ▼                                           ▼
//! ┌──────────────────────────────┐        ┌──────────────────────────┐
//! │ later turn: dispatch()       │        │ SubscriberSet            │
//! │  loop take_any(particle)     │        │  per-subscriber workers  │
//! │   └► handle.notify(..)       │        │  └► Subscribe::on_event  │
//! │       (Err / panic isolated) │        └──────────────────────────┘
//! │  queue empty ─► resolve idle │
//! └──────────────────────────────┘
//! ```
//!
//! ### Lifecycle of one busy period
//! ```text
//! idle ──enqueue──► busy (turn requested) ──more enqueues──► busy (same turn)
//!                     │
//!                     ▼ later turn
//!                 draining ──notify re-enqueues──► draining (same pass)
//!                     │
//!                     ▼ live map empty
//!                   idle (IdleSignal resolved, slot cleared)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Scheduling**    | Batching, FIFO per bucket, idle tracking                     | [`Scheduler`], [`IdleSignal`]               |
//! | **Deferral**      | Pluggable "later turn" primitive                             | [`Defer`], [`LocalDefer`], [`TurnQueue`]    |
//! | **Handles**       | Notification sinks and identities                            | [`Handle`], [`HandleFn`], [`ParticleId`]    |
//! | **Multi-arc**     | One scheduler per arc, global idle                           | [`SchedulerRegistry`]                       |
//! | **Events**        | Dispatch lifecycle broadcast                                 | [`Event`], [`EventKind`], [`Bus`]           |
//! | **Subscribers**   | Non-blocking event fan-out                                   | [`Subscribe`], [`SubscriberSet`]            |
//! | **Errors**        | Isolated delivery failures                                   | [`DeliveryError`]                           |
//! | **Configuration** | Label, bus capacity, failure log level                       | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use proxy_scheduler::{Config, HandleFn, HandleRef, LocalDefer, ParticleId, Scheduler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let local = tokio::task::LocalSet::new();
//!     local.run_until(async {
//!         let sched = Scheduler::builder(Config::labeled("arc-1"))
//!             .with_defer(Rc::new(LocalDefer))
//!             .build();
//!
//!         let handle: HandleRef = HandleFn::rc("titles", |kind, particle, payload| {
//!             println!("{kind} → {particle}: {payload}");
//!             Ok(())
//!         });
//!
//!         let particle = ParticleId::next();
//!         sched.enqueue(particle, &handle, "sync", serde_json::json!({ "v": 1 }));
//!         sched.enqueue(particle, &handle, "update", serde_json::json!({ "v": 2 }));
//!         assert!(sched.busy());
//!
//!         sched.is_idle().await;
//!         assert!(!sched.busy());
//!     }).await;
//! }
//! ```
mod core;
mod error;
mod events;
mod handles;
mod subscribers;

// ---- Public re-exports ----

pub use self::core::{
    Config, Defer, IdleSignal, Job, LocalDefer, Scheduler, SchedulerBuilder, SchedulerRegistry,
    SchedulerStats, TurnQueue,
};
pub use error::DeliveryError;
pub use events::{Bus, Event, EventKind};
pub use handles::{Handle, HandleFn, HandleId, HandleRef, NotifyKind, ParticleId, Payload};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
