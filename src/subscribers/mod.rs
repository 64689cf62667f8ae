//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used to observe events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Scheduler ── publish(Event) ──► Bus ──► SubscriberSet listener
//!                                               │
//!                                     ┌─────────┼─────────┐
//!                                     ▼         ▼         ▼
//!                                 LogWriter  Metrics   Custom ...
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
