//! Error types used by the scheduler and its handles.
//!
//! The scheduler itself has no failure modes visible to producers: `enqueue`
//! is infallible and `is_idle` always yields a resolvable signal. The only
//! error class is [`DeliveryError`], raised while a handle is being notified.
//! It is recovered locally (logged and published on the bus) and never
//! propagated back to the enqueuing caller.

use std::any::Any;

use thiserror::Error;

/// # Errors produced while delivering a notification to a handle.
///
/// Returned by [`Handle::notify`](crate::Handle::notify), or synthesized by the
/// scheduler when a notify call panics.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The handle rejected or failed to process the notification.
    #[error("delivery failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The handle panicked while processing the notification.
    #[error("handle panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl DeliveryError {
    /// Shorthand for [`DeliveryError::Failed`].
    ///
    /// # Example
    /// ```
    /// use proxy_scheduler::DeliveryError;
    ///
    /// let err = DeliveryError::fail("stale version");
    /// assert_eq!(err.to_string(), "delivery failed: stale version");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        DeliveryError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use proxy_scheduler::DeliveryError;
    ///
    /// let err = DeliveryError::Panicked { info: "boom".into() };
    /// assert_eq!(err.as_label(), "delivery_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::Failed { .. } => "delivery_failed",
            DeliveryError::Panicked { .. } => "delivery_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DeliveryError::Failed { error } => format!("error: {error}"),
            DeliveryError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Builds a [`DeliveryError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        DeliveryError::Panicked {
            info: panic_message(payload),
        }
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
