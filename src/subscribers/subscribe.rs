//! # Subscriber trait.
//!
//! Implement [`Subscribe`] to observe scheduler events. Each subscriber gets
//! its own worker and bounded lane inside a
//! [`SubscriberSet`](crate::subscribers::SubscriberSet), so a slow subscriber
//! never delays a dispatch pass. When its lane is full, events are dropped
//! for that subscriber only.
//!
//! ```rust
//! use async_trait::async_trait;
//! use proxy_scheduler::{Event, Subscribe};
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.is_delivery_failure() {
//!             // count it
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failures" }
//!     fn queue_capacity(&self) -> usize { 512 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Observer of scheduler events, run on a dedicated Tokio task.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Runs on this subscriber's worker, never on the dispatch pass.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's lane.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
