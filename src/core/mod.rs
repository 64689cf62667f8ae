//! Scheduler core: queueing, deferred dispatch and idle tracking.
//!
//! Internal modules:
//! - [`queue`]: particle → handle → FIFO bucket structure;
//! - [`idle`]: one-shot idle signal and the slot holding it;
//! - [`defer`]: deferred-execution primitives (`LocalDefer`, `TurnQueue`);
//! - [`scheduler`]: enqueue / busy / is_idle and the dispatch pass;
//! - [`builder`]: scheduler construction with events and subscribers;
//! - [`config`]: per-scheduler settings;
//! - [`registry`]: one scheduler per arc.

mod builder;
mod config;
mod defer;
mod idle;
mod queue;
mod registry;
mod scheduler;

pub use builder::SchedulerBuilder;
pub use config::Config;
pub use defer::{Defer, Job, LocalDefer, TurnQueue};
pub use idle::IdleSignal;
pub use registry::SchedulerRegistry;
pub use scheduler::{Scheduler, SchedulerStats};
