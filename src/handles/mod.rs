//! # Particles, handles and notification payloads.
//!
//! The scheduler treats particles and handles as opaque identities:
//! - [`ParticleId`] / [`HandleId`] - bucket keys
//! - [`NotifyKind`] - the event tag carried by each queued entry
//! - [`Payload`] - arbitrary structured data (`serde_json::Value`)
//! - [`Handle`] - the synchronous `notify` callback the scheduler delivers to
//! - [`HandleFn`] - closure-backed [`Handle`]

mod handle;
mod handle_fn;
mod ids;
mod kind;

pub use handle::{Handle, HandleRef, Payload};
pub use handle_fn::HandleFn;
pub use ids::{HandleId, ParticleId};
pub use kind::NotifyKind;
