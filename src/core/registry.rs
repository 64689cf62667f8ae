//! # Scheduler registry - one scheduler per arc.
//!
//! A host runtime runs many arcs side by side; each arc owns its own
//! [`Scheduler`]. The registry creates them on first use and answers
//! "is this arc idle?" / "is everything idle?".
//!
//! ## Architecture
//! ```text
//! SchedulerRegistry
//!   ├─ scheduler_for("arc-1") ─► lookup or factory("arc-1")
//!   ├─ wait_for_idle("arc-1") ─► loop { busy? ─► is_idle().await }
//!   └─ wait_for_all_idle()    ─► loop { any busy? ─► await each busy one }
//! ```
//!
//! ## Rules
//! - Unknown arcs count as idle.
//! - Waiting re-checks after every signal: a notification on one arc may
//!   enqueue work on another, so a single pass over the schedulers is not enough.
//! - No borrow is held across an `.await` or across the factory call.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::core::{config::Config, defer::Defer, scheduler::Scheduler};

type Factory = Box<dyn Fn(&str) -> Scheduler>;

/// Registry of per-arc schedulers.
pub struct SchedulerRegistry {
    schedulers: RefCell<HashMap<String, Scheduler>>,
    factory: Factory,
}

impl SchedulerRegistry {
    /// Creates a registry that builds new schedulers with `factory(arc_id)`.
    pub fn new(factory: impl Fn(&str) -> Scheduler + 'static) -> Self {
        Self {
            schedulers: RefCell::new(HashMap::new()),
            factory: Box::new(factory),
        }
    }

    /// Creates a registry whose schedulers share `defer` and are labeled with their arc id.
    pub fn with_defer(defer: Rc<dyn Defer>) -> Self {
        Self::new(move |arc_id| {
            Scheduler::builder(Config::labeled(arc_id.to_owned()))
                .with_defer(Rc::clone(&defer))
                .build()
        })
    }

    /// Returns the scheduler of `arc_id`, creating it on first use.
    pub fn scheduler_for(&self, arc_id: &str) -> Scheduler {
        if let Some(existing) = self.get(arc_id) {
            return existing;
        }
        let created = (self.factory)(arc_id);
        tracing::debug!(arc = arc_id, "scheduler created");
        self.schedulers
            .borrow_mut()
            .entry(arc_id.to_owned())
            .or_insert(created)
            .clone()
    }

    /// Returns the scheduler of `arc_id`, if one exists.
    pub fn get(&self, arc_id: &str) -> Option<Scheduler> {
        self.schedulers.borrow().get(arc_id).cloned()
    }

    /// Forgets the scheduler of `arc_id`.
    ///
    /// Entries already queued on it are still delivered: its pending turn keeps it alive.
    pub fn remove(&self, arc_id: &str) -> Option<Scheduler> {
        let removed = self.schedulers.borrow_mut().remove(arc_id);
        if let Some(sched) = &removed {
            tracing::debug!(arc = arc_id, queued = sched.len(), "scheduler removed");
        }
        removed
    }

    /// Returns sorted list of arc ids.
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.schedulers.borrow().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of arcs with a scheduler.
    pub fn len(&self) -> usize {
        self.schedulers.borrow().len()
    }

    /// Returns `true` if no scheduler has been created (or all were removed).
    pub fn is_empty(&self) -> bool {
        self.schedulers.borrow().is_empty()
    }

    /// Returns `true` if `arc_id` has nothing queued (unknown arcs are idle).
    pub fn is_idle(&self, arc_id: &str) -> bool {
        self.get(arc_id).map_or(true, |s| !s.busy())
    }

    /// Returns `true` if no scheduler has anything queued.
    pub fn all_idle(&self) -> bool {
        self.schedulers.borrow().values().all(|s| !s.busy())
    }

    /// Waits until `arc_id` has nothing queued.
    pub async fn wait_for_idle(&self, arc_id: &str) {
        loop {
            let Some(sched) = self.get(arc_id) else {
                return;
            };
            if !sched.busy() {
                return;
            }
            sched.is_idle().await;
        }
    }

    /// Waits until every scheduler has nothing queued at the same time.
    pub async fn wait_for_all_idle(&self) {
        loop {
            let busy: Vec<Scheduler> = self
                .schedulers
                .borrow()
                .values()
                .filter(|s| s.busy())
                .cloned()
                .collect();
            if busy.is_empty() {
                return;
            }
            for sched in busy {
                sched.is_idle().await;
            }
        }
    }
}

impl std::fmt::Debug for SchedulerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerRegistry")
            .field("arcs", &self.list())
            .finish_non_exhaustive()
    }
}
