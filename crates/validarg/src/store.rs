//! Per-instance value storage.
//!
//! Maps instance identity to the last validated value for one attribute.
//! Entries hold only a weak reference back to the instance; they are removed
//! by the lifeline's drop callback, which in turn holds only a weak
//! reference to the store.

use crate::lifeline::{InstanceId, Lifeline, WeakLifeline};
use crate::value::AttrValue;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::trace;

struct Entry {
    back_ref: WeakLifeline,
    value: AttrValue,
}

type Entries = HashMap<InstanceId, Entry>;

/// Identity-keyed store of validated values.
///
/// Read-only outside the crate: values only enter through
/// [`ValidArg::set`](crate::ValidArg::set), which validates them and arranges
/// their eviction.
///
/// Uses a `parking_lot::Mutex` since lifelines may be dropped on any thread,
/// and the drop callback mutates the same map as the write path.
#[derive(Default)]
pub struct InstanceStore {
    entries: Arc<Mutex<Entries>>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value for an instance, if it was ever assigned.
    pub fn get(&self, id: InstanceId) -> Option<AttrValue> {
        self.entries.lock().get(&id).map(|entry| entry.value.clone())
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Store a value for the instance, replacing any prior entry.
    ///
    /// Returns `true` when this created the entry, meaning the caller still
    /// has to arrange for its eviction.
    pub(crate) fn insert(&self, lifeline: &Lifeline, value: AttrValue) -> bool {
        let entry = Entry {
            back_ref: lifeline.downgrade(),
            value,
        };
        self.entries.lock().insert(lifeline.id(), entry).is_none()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of every instance holding a value, in no particular order.
    pub fn ids(&self) -> Vec<InstanceId> {
        self.entries.lock().keys().copied().collect()
    }

    pub(crate) fn downgrade(&self) -> WeakStore {
        WeakStore(Arc::downgrade(&self.entries))
    }
}

/// Handle held by drop callbacks. Does not keep the store alive.
#[derive(Clone)]
pub(crate) struct WeakStore(Weak<Mutex<Entries>>);

impl WeakStore {
    /// Whether the store this handle points to still exists.
    pub(crate) fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Remove the entry whose back-reference is `dead`.
    ///
    /// Scans for the first matching entry. Finding none, or finding the store
    /// itself gone, is not an error.
    pub(crate) fn evict(&self, attr: &str, dead: &WeakLifeline) -> Option<InstanceId> {
        let Some(entries) = self.0.upgrade() else {
            trace!(attr, instance = %dead.id(), "store already dropped");
            return None;
        };
        let mut entries = entries.lock();
        let key = entries
            .iter()
            .find(|(_, entry)| entry.back_ref.ptr_eq(dead))
            .map(|(key, _)| *key);
        match key {
            Some(key) => {
                entries.remove(&key);
                trace!(attr, instance = %key, "evicted value of dropped instance");
                Some(key)
            }
            None => {
                trace!(attr, instance = %dead.id(), "no entry to evict");
                None
            }
        }
    }
}
