//! # Idle signal.
//!
//! [`IdleSignal`] is the only thing a caller can await on a scheduler. It is a
//! cloneable one-shot future:
//! - **ready** when created while the scheduler is not busy (first poll returns `Ready`);
//! - **pending** otherwise, resolved exactly once when the queue drains.
//!
//! The scheduler stores at most one pending signal in an [`IdleSlot`]; every
//! `is_idle()` call during the same busy period clones that one signal.
//!
//! ```text
//! IdleSlot::Empty ──is_idle() while busy──► IdleSlot::Pending { tx, signal }
//!        ▲                                          │
//!        └────────── resolve(): tx.send(()) ────────┘
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::task::{Context, Poll};

use futures::future::{FutureExt, Shared};
use tokio::sync::oneshot;

/// Generation counter; each pending signal gets a distinct generation.
static SIGNAL_GEN: AtomicU64 = AtomicU64::new(1);

#[derive(Clone)]
enum SignalState {
    Ready,
    Pending {
        generation: u64,
        rx: Shared<oneshot::Receiver<()>>,
    },
}

/// One-shot completion signal resolved when a scheduler becomes idle.
///
/// Resolves with `()`. It also resolves if the owning scheduler goes away
/// with work still queued, which happens only once its pending turn is dropped
/// as well (nothing is left to wait for).
#[derive(Clone)]
#[must_use = "an idle signal does nothing unless awaited"]
pub struct IdleSignal {
    state: SignalState,
}

impl IdleSignal {
    /// An already-resolved signal.
    pub fn ready() -> Self {
        Self {
            state: SignalState::Ready,
        }
    }

    fn pending(rx: oneshot::Receiver<()>) -> Self {
        Self {
            state: SignalState::Pending {
                generation: SIGNAL_GEN.fetch_add(1, AtomicOrdering::Relaxed),
                rx: rx.shared(),
            },
        }
    }

    /// Returns `true` if awaiting this signal would complete immediately.
    pub fn is_resolved(&self) -> bool {
        match &self.state {
            SignalState::Ready => true,
            SignalState::Pending { rx, .. } => rx.clone().now_or_never().is_some(),
        }
    }

    /// Returns `true` if both values are clones of the same pending signal.
    ///
    /// Ready signals are never "the same": each one stands alone.
    pub fn same_signal(&self, other: &IdleSignal) -> bool {
        match (&self.state, &other.state) {
            (
                SignalState::Pending { generation: a, .. },
                SignalState::Pending { generation: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

impl Future for IdleSignal {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match &mut self.get_mut().state {
            SignalState::Ready => Poll::Ready(()),
            // Err means the sender was dropped with the scheduler.
            SignalState::Pending { rx, .. } => Pin::new(rx).poll(cx).map(|_| ()),
        }
    }
}

impl fmt::Debug for IdleSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            SignalState::Ready => f.write_str("IdleSignal::Ready"),
            SignalState::Pending { generation, .. } => f
                .debug_struct("IdleSignal::Pending")
                .field("generation", generation)
                .field("resolved", &self.is_resolved())
                .finish(),
        }
    }
}

/// Slot holding the single outstanding idle signal.
#[derive(Default)]
pub(crate) enum IdleSlot {
    #[default]
    Empty,
    Pending {
        tx: oneshot::Sender<()>,
        signal: IdleSignal,
    },
}

impl IdleSlot {
    /// Returns the outstanding signal, creating it if the slot is empty.
    pub(crate) fn get_or_create(&mut self) -> IdleSignal {
        if let IdleSlot::Pending { signal, .. } = self {
            return signal.clone();
        }
        let (tx, rx) = oneshot::channel();
        let signal = IdleSignal::pending(rx);
        *self = IdleSlot::Pending {
            tx,
            signal: signal.clone(),
        };
        signal
    }

    /// Resolves and clears the outstanding signal. Returns `false` if there was none.
    pub(crate) fn resolve(&mut self) -> bool {
        match std::mem::take(self) {
            IdleSlot::Pending { tx, .. } => {
                // No live waiters is fine.
                let _ = tx.send(());
                true
            }
            IdleSlot::Empty => false,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        matches!(self, IdleSlot::Pending { .. })
    }
}
