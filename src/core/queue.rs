//! # Pending-notification queue structure.
//!
//! ```text
//! ParticleQueues
//!   └─ HashMap<ParticleId, HandleBuckets>
//!         └─ HashMap<HandleId, Bucket { handle, VecDeque<QueueEntry> }>
//! ```
//!
//! ## Rules
//! - A bucket exists only while it holds at least one entry; so does a particle key.
//! - Entries inside a bucket keep insertion order (FIFO).
//! - No order is defined across particles or across handles of one particle.
//! - [`ParticleQueues::take_any`] removes a whole particle at once, so entries
//!   enqueued while that particle is being delivered land in a fresh bucket.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use crate::handles::{Handle, HandleId, HandleRef, NotifyKind, ParticleId, Payload};

/// One pending notification. Immutable once created.
#[derive(Debug, Clone)]
pub(crate) struct QueueEntry {
    pub(crate) kind: NotifyKind,
    pub(crate) particle: ParticleId,
    pub(crate) payload: Payload,
}

/// FIFO of entries for one (particle, handle) pair.
pub(crate) struct Bucket {
    pub(crate) handle: HandleRef,
    pub(crate) entries: VecDeque<QueueEntry>,
}

/// All buckets of one particle, keyed by handle.
pub(crate) type HandleBuckets = HashMap<HandleId, Bucket>;

/// Map-of-maps holding every pending entry.
#[derive(Default)]
pub(crate) struct ParticleQueues {
    by_particle: HashMap<ParticleId, HandleBuckets>,
    len: usize,
}

impl ParticleQueues {
    /// Appends an entry to the `(particle, handle)` bucket, creating containers on first use.
    pub(crate) fn push(&mut self, particle: ParticleId, handle: &HandleRef, entry: QueueEntry) {
        let buckets = self.by_particle.entry(particle).or_default();
        match buckets.entry(handle.id()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().entries.push_back(entry),
            Entry::Vacant(vacant) => {
                vacant.insert(Bucket {
                    handle: HandleRef::clone(handle),
                    entries: VecDeque::from([entry]),
                });
            }
        }
        self.len += 1;
    }

    /// Removes and returns an arbitrary particle together with all its buckets.
    pub(crate) fn take_any(&mut self) -> Option<(ParticleId, HandleBuckets)> {
        let particle = *self.by_particle.keys().next()?;
        let buckets = self.by_particle.remove(&particle)?;
        self.len -= buckets.values().map(|b| b.entries.len()).sum::<usize>();
        Some((particle, buckets))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_particle.is_empty()
    }

    /// Total number of entries across all buckets.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of entries queued for one particle.
    pub(crate) fn len_for(&self, particle: ParticleId) -> usize {
        self.by_particle
            .get(&particle)
            .map(|buckets| buckets.values().map(|b| b.entries.len()).sum())
            .unwrap_or(0)
    }

    /// Number of distinct particles with pending work.
    pub(crate) fn particle_count(&self) -> usize {
        self.by_particle.len()
    }
}
