//! Listener registry
//!
//! Deduplicated set of remote listeners for one event category.
//!
//! Membership lives in a `HashMap` keyed by [`ListenerId`] behind its own
//! `RwLock`, independent from the playback session lock. A broadcast never
//! iterates the map directly: it takes a [`snapshot`](ListenerRegistry::snapshot)
//! and calls listeners after the lock is released, so register/unregister
//! from other threads can never invalidate an in-flight iteration.

use crate::listener::{ListenerHandle, ListenerId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct Entry<L: ?Sized> {
    /// Registration order
    seq: u64,
    listener: Arc<L>,
}

struct Members<L: ?Sized> {
    entries: HashMap<ListenerId, Entry<L>>,
    next_seq: u64,
}

/// Registered listeners of one category
pub struct ListenerRegistry<L: ?Sized> {
    members: RwLock<Members<L>>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            members: RwLock::new(Members {
                entries: HashMap::new(),
                next_seq: 0,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Members<L>> {
        self.members.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Members<L>> {
        self.members.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a listener
    ///
    /// Returns `false` (and changes nothing) if a listener with the same
    /// identity is already registered.
    pub fn register(&self, handle: ListenerHandle<L>) -> bool {
        let (id, listener) = handle.into_parts();
        let mut members = self.write();
        if members.entries.contains_key(&id) {
            return false;
        }

        let seq = members.next_seq;
        members.next_seq += 1;
        members.entries.insert(id, Entry { seq, listener });
        true
    }

    /// Remove a listener
    ///
    /// Returns `false` if it was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        self.write().entries.remove(&id).is_some()
    }

    /// Drop a listener whose connection died
    ///
    /// Same effect as [`unregister`](Self::unregister); logged separately
    /// because the client did not ask for it.
    pub fn kill(&self, id: ListenerId) -> bool {
        let removed = self.unregister(id);
        if removed {
            tracing::info!(listener = %id, "Dropped listener after connection death");
        }
        removed
    }

    /// Consistent copy of the current members, in registration order
    pub fn snapshot(&self) -> Vec<ListenerHandle<L>> {
        let members = self.read();
        let mut entries: Vec<(&ListenerId, &Entry<L>)> = members.entries.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);

        entries
            .into_iter()
            .map(|(id, entry)| ListenerHandle::new(*id, Arc::clone(&entry.listener)))
            .collect()
    }

    /// Whether a listener with this identity is registered
    pub fn contains(&self, id: ListenerId) -> bool {
        self.read().entries.contains_key(&id)
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    /// Check if no listener is registered
    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}
