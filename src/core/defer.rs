//! # Deferred-execution primitives.
//!
//! The scheduler never dispatches on the producer's stack. It hands a single
//! [`Job`] to a [`Defer`] implementation, which must run it on a **later turn**
//! of the same single-threaded execution context.
//!
//! ## Implementations
//! - [`LocalDefer`] - posts the job as a `tokio::task::spawn_local` task. Requires a
//!   [`LocalSet`](tokio::task::LocalSet) on a current-thread runtime.
//! - [`TurnQueue`] - host-driven run-to-completion queue. The host decides when
//!   a turn runs (`run_next` / `run_until_stalled`); useful for synchronous
//!   embeddings and deterministic tests.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use proxy_scheduler::{Defer, TurnQueue};
//!
//! let turns = TurnQueue::new();
//! let hit = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&hit);
//! turns.defer(Box::new(move || flag.set(true)));
//!
//! assert!(!hit.get());
//! assert_eq!(turns.run_until_stalled(), 1);
//! assert!(hit.get());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Deferred unit of work.
pub type Job = Box<dyn FnOnce() + 'static>;

/// "Run this callback on a later turn of the single-threaded execution context."
pub trait Defer: 'static {
    /// Schedules `job`. Must not run it synchronously.
    fn defer(&self, job: Job);
}

/// [`Defer`] backed by `tokio::task::spawn_local`.
///
/// Every job becomes a local task; it runs the next time the enclosing
/// [`LocalSet`](tokio::task::LocalSet) is polled, after the current task yields.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDefer;

impl Defer for LocalDefer {
    fn defer(&self, job: Job) {
        // Panics outside a LocalSet, same as spawn_local itself.
        tokio::task::spawn_local(async move { job() });
    }
}

/// Host-driven FIFO of deferred turns.
///
/// A pending turn holds a clone of the scheduler that deferred it, and that
/// scheduler holds the `Rc` of this queue. Dropping both without running or
/// [discarding](Self::discard) the pending turns leaks the cycle, and
/// [`IdleSignal`](crate::IdleSignal) waiters of that scheduler never resolve.
#[derive(Default)]
pub struct TurnQueue {
    jobs: RefCell<VecDeque<Job>>,
    executed: Cell<usize>,
}

impl TurnQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of turns waiting to run.
    pub fn pending(&self) -> usize {
        self.jobs.borrow().len()
    }

    /// Total number of turns executed so far.
    pub fn executed(&self) -> usize {
        self.executed.get()
    }

    /// Runs the oldest pending turn. Returns `false` if there was none.
    ///
    /// The job runs with no borrow held, so it may defer further turns.
    pub fn run_next(&self) -> bool {
        let job = self.jobs.borrow_mut().pop_front();
        match job {
            Some(job) => {
                job();
                self.executed.set(self.executed.get() + 1);
                true
            }
            None => false,
        }
    }

    /// Drops every pending turn without running it. Returns how many were dropped.
    ///
    /// Entries queued on a scheduler that is no longer referenced elsewhere are
    /// lost, and its idle waiters resolve.
    pub fn discard(&self) -> usize {
        let jobs = std::mem::take(&mut *self.jobs.borrow_mut());
        let dropped = jobs.len();
        // Dropped outside the borrow: a job may own the last clone of a scheduler.
        drop(jobs);
        dropped
    }

    /// Runs turns until none are pending, including turns deferred by the
    /// turns it runs. Returns how many turns ran.
    pub fn run_until_stalled(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Defer for TurnQueue {
    fn defer(&self, job: Job) {
        self.jobs.borrow_mut().push_back(job);
    }
}
