//! # Function-backed handle (`HandleFn`)
//!
//! [`HandleFn`] wraps a closure `F: Fn(&NotifyKind, ParticleId, &Payload) -> Result<(), DeliveryError>`
//! and gives it a fresh [`HandleId`]. Useful for hosts that route
//! notifications through callbacks, and for tests.
//!
//! ## Example
//! ```rust
//! use proxy_scheduler::{HandleFn, HandleRef};
//!
//! let h: HandleRef = HandleFn::rc("log", |kind, particle, _payload| {
//!     println!("{kind} for {particle}");
//!     Ok(())
//! });
//! assert_eq!(h.name(), "log");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::error::DeliveryError;
use crate::handles::{Handle, HandleId, NotifyKind, ParticleId, Payload};

/// Function-backed handle implementation.
pub struct HandleFn<F> {
    id: HandleId,
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandleFn<F>
where
    F: Fn(&NotifyKind, ParticleId, &Payload) -> Result<(), DeliveryError> + 'static,
{
    /// Creates a new function-backed handle with a fresh id.
    ///
    /// Prefer [`HandleFn::rc`] when you immediately need a [`HandleRef`](crate::HandleRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            id: HandleId::next(),
            name: name.into(),
            f,
        }
    }

    /// Creates the handle and returns it as a shared reference.
    pub fn rc(name: impl Into<Cow<'static, str>>, f: F) -> Rc<Self> {
        Rc::new(Self::new(name, f))
    }
}

impl<F> fmt::Debug for HandleFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleFn")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> Handle for HandleFn<F>
where
    F: Fn(&NotifyKind, ParticleId, &Payload) -> Result<(), DeliveryError> + 'static,
{
    fn id(&self) -> HandleId {
        self.id
    }

    fn notify(
        &self,
        kind: &NotifyKind,
        particle: ParticleId,
        payload: &Payload,
    ) -> Result<(), DeliveryError> {
        (self.f)(kind, particle, payload)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
