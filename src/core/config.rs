//! # Scheduler configuration.
//!
//! Provides [`Config`] centralized settings for a [`Scheduler`](crate::Scheduler).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → events disabled (no [`Bus`](crate::Bus) is created)

use std::borrow::Cow;

/// Configuration for one scheduler instance.
///
/// ## Field semantics
/// - `label`: name attached to log records and events (e.g. the arc id)
/// - `bus_capacity`: event bus ring buffer size (`0` = no events)
/// - `warn_on_failure`: log delivery failures at `warn` (`true`) or `debug` (`false`)
#[derive(Clone, Debug)]
pub struct Config {
    /// Name of the scheduler in logs and events.
    pub label: Cow<'static, str>,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// - `0` = events disabled, subscribers cannot be attached
    /// - `n > 0` = lagging receivers skip events older than the last `n`
    pub bus_capacity: usize,

    /// Log level for swallowed delivery failures.
    ///
    /// Failures are always counted and published; this only picks the log level.
    pub warn_on_failure: bool,
}

impl Config {
    /// Creates a default configuration with the given label.
    pub fn labeled(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Returns the event bus capacity as an `Option`.
    ///
    /// - `None` → events disabled
    /// - `Some(n)` → bus with capacity `n`
    #[inline]
    pub fn event_capacity(&self) -> Option<usize> {
        if self.bus_capacity == 0 {
            None
        } else {
            Some(self.bus_capacity)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `label = "scheduler"`
    /// - `bus_capacity = 1024`
    /// - `warn_on_failure = true`
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("scheduler"),
            bus_capacity: 1024,
            warn_on_failure: true,
        }
    }
}
