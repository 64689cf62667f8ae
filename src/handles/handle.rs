//! # Handle abstraction.
//!
//! A [`Handle`] is the notification source the scheduler calls back into.
//! The shared reference type is [`HandleRef`], an `Rc<dyn Handle>`: handles
//! live on the same single-threaded execution context as the scheduler and
//! are not required to be `Send`.

use std::rc::Rc;

use crate::error::DeliveryError;
use crate::handles::{HandleId, NotifyKind, ParticleId};

/// Structured notification payload. Never interpreted by the scheduler.
pub type Payload = serde_json::Value;

/// Shared handle reference stored inside scheduler buckets.
pub type HandleRef = Rc<dyn Handle>;

/// # Synchronous notification sink.
///
/// [`notify`](Handle::notify) runs to completion before the scheduler moves on
/// to the next queued entry. It may call back into
/// [`Scheduler::enqueue`](crate::Scheduler::enqueue); such entries are
/// delivered later in the same dispatch pass.
///
/// # Example
/// ```
/// use proxy_scheduler::{DeliveryError, Handle, HandleId, NotifyKind, ParticleId, Payload};
///
/// struct Counter {
///     id: HandleId,
/// }
///
/// impl Handle for Counter {
///     fn id(&self) -> HandleId { self.id }
///
///     fn notify(&self, kind: &NotifyKind, _particle: ParticleId, _payload: &Payload)
///         -> Result<(), DeliveryError>
///     {
///         match kind {
///             NotifyKind::Desync => Err(DeliveryError::fail("store went away")),
///             _ => Ok(()),
///         }
///     }
/// }
/// ```
pub trait Handle: 'static {
    /// Stable identity used as the bucket key.
    fn id(&self) -> HandleId;

    /// Delivers one notification.
    fn notify(
        &self,
        kind: &NotifyKind,
        particle: ParticleId,
        payload: &Payload,
    ) -> Result<(), DeliveryError>;

    /// Human-readable name (for logs/events).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
