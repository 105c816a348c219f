//! Instance identity and death notification.
//!
//! A host type embeds one [`Lifeline`]. Validators key their stored values by
//! the lifeline's [`InstanceId`] and keep only a [`WeakLifeline`] back to it,
//! so they never extend the instance's lifetime. When the lifeline is dropped
//! every callback registered with [`Lifeline::on_drop`] runs once, with the
//! now-dead weak reference.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Identity of one host instance. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(Uuid);

impl InstanceId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Watcher {
    /// `false` once the callback has nothing left to act on.
    live: Box<dyn Fn() -> bool + Send>,
    callback: Box<dyn FnOnce() + Send>,
}

struct Core {
    id: InstanceId,
    watchers: Mutex<Vec<Watcher>>,
}

impl Drop for Core {
    fn drop(&mut self) {
        // Strong count is already zero here: weak references can no longer
        // be upgraded while the callbacks run.
        for watcher in self.watchers.get_mut().drain(..) {
            (watcher.callback)();
        }
    }
}

/// The identity token a host instance owns.
///
/// Cloning yields a fresh identity with no watchers, the same way a copied
/// host value is a distinct instance with nothing stored for it yet.
pub struct Lifeline {
    core: Arc<Core>,
}

impl Lifeline {
    pub fn new() -> Self {
        Self {
            core: Arc::new(Core {
                id: InstanceId::new(),
                watchers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.core.id
    }

    /// A non-owning reference to this lifeline.
    pub fn downgrade(&self) -> WeakLifeline {
        WeakLifeline {
            id: self.core.id,
            core: Arc::downgrade(&self.core),
        }
    }

    /// Register a callback to run when this lifeline is dropped.
    ///
    /// Callbacks run in registration order and receive a weak reference to
    /// the lifeline that is already dead.
    pub fn on_drop<F>(&self, callback: F)
    where
        F: FnOnce(&WeakLifeline) + Send + 'static,
    {
        self.on_drop_while(|| true, callback);
    }

    /// Like [`on_drop`](Self::on_drop), but the callback is discarded once
    /// `live` returns `false`.
    ///
    /// Discarded callbacks are pruned whenever a new one is registered, so a
    /// long-lived instance touched by many short-lived watchers only keeps
    /// the ones still alive.
    pub fn on_drop_while<P, F>(&self, live: P, callback: F)
    where
        P: Fn() -> bool + Send + 'static,
        F: FnOnce(&WeakLifeline) + Send + 'static,
    {
        let dead = self.downgrade();
        let mut watchers = self.core.watchers.lock();
        watchers.retain(|watcher| (watcher.live)());
        watchers.push(Watcher {
            live: Box::new(live),
            callback: Box::new(move || callback(&dead)),
        });
    }

    /// Number of callbacks waiting for this lifeline to drop.
    pub fn watcher_count(&self) -> usize {
        self.core.watchers.lock().len()
    }
}

impl Default for Lifeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Lifeline {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for Lifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifeline").field("id", &self.core.id).finish()
    }
}

/// Weak back-reference to a [`Lifeline`].
#[derive(Clone)]
pub struct WeakLifeline {
    id: InstanceId,
    core: Weak<Core>,
}

impl WeakLifeline {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.core.strong_count() > 0
    }

    /// Whether both references point at the same lifeline, dead or alive.
    pub fn ptr_eq(&self, other: &WeakLifeline) -> bool {
        Weak::ptr_eq(&self.core, &other.core)
    }
}

impl fmt::Debug for WeakLifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakLifeline")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Implemented by host types that carry validated attributes.
pub trait HasLifeline {
    fn lifeline(&self) -> &Lifeline;
}

impl HasLifeline for Lifeline {
    fn lifeline(&self) -> &Lifeline {
        self
    }
}

impl<T: HasLifeline + ?Sized> HasLifeline for Box<T> {
    fn lifeline(&self) -> &Lifeline {
        (**self).lifeline()
    }
}

impl<T: HasLifeline + ?Sized> HasLifeline for Arc<T> {
    fn lifeline(&self) -> &Lifeline {
        (**self).lifeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn ids_are_unique() {
        let a = Lifeline::new();
        let b = Lifeline::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn clone_is_a_new_identity() {
        let a = Lifeline::new();
        a.on_drop(|_| {});
        let b = a.clone();
        assert_ne!(a.id(), b.id());
        assert_eq!(b.watcher_count(), 0);
    }

    #[test]
    fn weak_reference_dies_with_lifeline() {
        let lifeline = Lifeline::new();
        let weak = lifeline.downgrade();
        assert!(weak.is_alive());
        drop(lifeline);
        assert!(!weak.is_alive());
    }

    #[test]
    fn callbacks_run_once_in_order_with_dead_reference() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let lifeline = Lifeline::new();
        let id = lifeline.id();

        for n in 0..3 {
            let order = Arc::clone(&order);
            lifeline.on_drop(move |dead| {
                assert!(!dead.is_alive());
                assert_eq!(dead.id(), id);
                order.lock().push(n);
            });
        }
        assert_eq!(lifeline.watcher_count(), 3);
        assert!(order.lock().is_empty());

        drop(lifeline);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn callback_reference_matches_earlier_downgrade() {
        let lifeline = Lifeline::new();
        let kept = lifeline.downgrade();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        lifeline.on_drop(move |dead| {
            if dead.ptr_eq(&kept) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        drop(lifeline);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_lifelines_are_not_ptr_eq() {
        let a = Lifeline::new();
        let b = Lifeline::new();
        assert!(!a.downgrade().ptr_eq(&b.downgrade()));
        assert!(a.downgrade().ptr_eq(&a.downgrade()));
    }

    #[test]
    fn stale_watchers_are_pruned_on_registration() {
        use std::sync::atomic::AtomicBool;

        let lifeline = Lifeline::new();
        let first_live = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&first_live);
        lifeline.on_drop_while(move || flag.load(Ordering::SeqCst), |_| {});
        lifeline.on_drop(|_| {});
        assert_eq!(lifeline.watcher_count(), 2);

        first_live.store(false, Ordering::SeqCst);
        lifeline.on_drop(|_| {});
        assert_eq!(lifeline.watcher_count(), 2);
    }

    #[test]
    fn pruned_watchers_never_run() {
        let hits = Arc::new(AtomicUsize::new(0));
        let lifeline = Lifeline::new();
        let counter = Arc::clone(&hits);
        lifeline.on_drop_while(
            || false,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        lifeline.on_drop(|_| {});
        drop(lifeline);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn drop_on_another_thread_runs_callbacks() {
        let hits = Arc::new(AtomicUsize::new(0));
        let lifeline = Lifeline::new();
        let counter = Arc::clone(&hits);
        lifeline.on_drop(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        std::thread::spawn(move || drop(lifeline))
            .join()
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
