//! # LogWriter - tracing event renderer
//!
//! A minimal subscriber that renders incoming [`Event`]s through `tracing`.
//! Use it for demos, or when no dedicated observability pipeline exists.
//!
//! ## Example output (fmt layer)
//! ```text
//! DEBUG proxy_scheduler: [dispatch-scheduled] scheduler="arc-1"
//! DEBUG proxy_scheduler: [dispatch-started] scheduler="arc-1"
//!  WARN proxy_scheduler: [delivery-failed] scheduler="arc-1" particle=4 handle=9 kind="update" err="boom"
//! DEBUG proxy_scheduler: [dispatch-finished] scheduler="arc-1" delivered=2 failed=1
//! DEBUG proxy_scheduler: [idle] scheduler="arc-1"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let scheduler = e.scheduler.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::DispatchScheduled => {
                tracing::debug!(target: "proxy_scheduler", scheduler, "[dispatch-scheduled]");
            }
            EventKind::DispatchStarted => {
                tracing::debug!(target: "proxy_scheduler", scheduler, "[dispatch-started]");
            }
            EventKind::DispatchFinished => {
                tracing::debug!(
                    target: "proxy_scheduler",
                    scheduler,
                    delivered = e.delivered.unwrap_or(0),
                    failed = e.failed.unwrap_or(0),
                    "[dispatch-finished]"
                );
            }
            EventKind::DeliveryFailed => {
                tracing::warn!(
                    target: "proxy_scheduler",
                    scheduler,
                    particle = e.particle.map(|p| p.as_u64()),
                    handle = e.handle.map(|h| h.as_u64()),
                    kind = e.notify_kind.as_deref(),
                    err = e.reason.as_deref(),
                    "[delivery-failed]"
                );
            }
            EventKind::IdleResolved => {
                tracing::debug!(target: "proxy_scheduler", scheduler, "[idle]");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(
                    target: "proxy_scheduler",
                    subscriber = e.subscriber.as_deref(),
                    reason = e.reason.as_deref(),
                    "[subscriber-overflow]"
                );
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(
                    target: "proxy_scheduler",
                    subscriber = e.subscriber.as_deref().unwrap_or("unknown"),
                    info = e.reason.as_deref().unwrap_or("unknown"),
                    "[subscriber-panicked]"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
