//! # Opaque identities for particles and handles.
//!
//! The scheduler never looks inside a particle or a handle: it only needs a
//! stable identity to key its buckets. Both ids are small `Copy` newtypes over
//! `u64`, minted from process-wide counters (same scheme as event sequence
//! numbers) or adopted from a host's own numbering via `from_raw`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static PARTICLE_SEQ: AtomicU64 = AtomicU64::new(1);
static HANDLE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Identity of a notification consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

impl ParticleId {
    /// Mints a fresh, process-unique id.
    pub fn next() -> Self {
        Self(PARTICLE_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Wraps an id assigned by the host runtime.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "particle#{}", self.0)
    }
}

/// Identity of a notification source (the bucket key below a particle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    /// Mints a fresh, process-unique id.
    pub fn next() -> Self {
        Self(HANDLE_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Wraps an id assigned by the host runtime.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}
