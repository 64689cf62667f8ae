//! # Notification kinds.
//!
//! A [`NotifyKind`] is the tag carried by every queued entry. The storage
//! layer of the data-binding runtime produces three well-known kinds
//! (`sync`, `update`, `desync`); anything else travels as
//! [`NotifyKind::Custom`]. The scheduler only forwards the tag.

use std::fmt;
use std::sync::Arc;

/// Tag describing what happened on a handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotifyKind {
    /// The handle finished (re)synchronizing with its store.
    Sync,
    /// The handle's data changed.
    Update,
    /// The handle lost synchronization with its store.
    Desync,
    /// Any other non-empty tag.
    Custom(Arc<str>),
}

impl NotifyKind {
    /// Returns the wire tag of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            NotifyKind::Sync => "sync",
            NotifyKind::Update => "update",
            NotifyKind::Desync => "desync",
            NotifyKind::Custom(tag) => &**tag,
        }
    }

    /// Returns `true` if the tag is non-empty.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.as_str().is_empty()
    }
}

impl From<&str> for NotifyKind {
    fn from(tag: &str) -> Self {
        match tag {
            "sync" => NotifyKind::Sync,
            "update" => NotifyKind::Update,
            "desync" => NotifyKind::Desync,
            other => NotifyKind::Custom(Arc::from(other)),
        }
    }
}

impl From<String> for NotifyKind {
    fn from(tag: String) -> Self {
        NotifyKind::from(tag.as_str())
    }
}

impl fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
