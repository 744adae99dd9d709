//! Shared state container with change notification
//!
//! Views read the current value with [`Store::get`]; every
//! [`Store::update`] notifies subscribers with the new value once the write
//! lock has been released, so a subscriber may read the store again.
//!
//! Updates are serialised together with their notifications: subscribers
//! see the values in the order they were written. A subscriber must not
//! call [`Store::update`] on the store that notified it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Inner<S> {
    state: RwLock<S>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<S>)>>,
    /// Held from the write until the last subscriber has returned
    ordering: Mutex<()>,
    next_id: AtomicU64,
}

/// Cloning a store shares its state and subscribers
pub struct Store<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial),
                listeners: Mutex::new(Vec::new()),
                ordering: Mutex::new(()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Snapshot of the current state
    pub fn get(&self) -> S {
        self.inner
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Read part of the state without cloning all of it
    pub fn select<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&state)
    }

    /// Mutate the state, then notify every subscriber
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let _ordered = self
            .inner
            .ordering
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let (result, snapshot) = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let result = f(&mut state);
            (result, state.clone())
        };
        self.notify(&snapshot);
        result
    }

    pub fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, Arc::new(listener)));
        id
    }

    /// Returns false when the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners().len()
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Listener<S>)>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, state: &S) {
        let listeners: Vec<Listener<S>> = self
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_update_notifies_subscribers() {
        let store = Store::new(0_i32);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |value| sink.lock().unwrap().push(*value));

        store.update(|value| *value += 5);
        store.update(|value| *value *= 2);

        assert_eq!(store.get(), 10);
        assert_eq!(*seen.lock().unwrap(), vec![5, 10]);
    }

    #[test]
    fn test_unsubscribe() {
        let store = Store::new(String::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.update(|s| s.push('a'));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.update(|s| s.push('b'));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get(), "ab");
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::new(vec![1]);
        let other = store.clone();
        other.update(|v| v.push(2));
        assert_eq!(store.get(), vec![1, 2]);
        assert_eq!(store.select(|v| v.len()), 2);
    }

    #[test]
    fn test_subscriber_can_read_store() {
        let store = Store::new(1_u32);
        let reader = store.clone();
        let observed = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&observed);
        store.subscribe(move |_| {
            sink.store(reader.get() as usize, Ordering::SeqCst);
        });
        store.update(|v| *v = 7);
        assert_eq!(observed.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_concurrent_updates_notify_in_write_order() {
        let store = Store::new(0_u32);
        let last_seen = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&last_seen);
        store.subscribe(move |value| {
            if *value == 1 {
                std::thread::sleep(std::time::Duration::from_millis(150));
            }
            sink.store(*value as usize, Ordering::SeqCst);
        });

        let slow = store.clone();
        let writer = std::thread::spawn(move || slow.update(|v| *v = 1));
        std::thread::sleep(std::time::Duration::from_millis(40));
        store.update(|v| *v = 2);
        writer.join().unwrap();

        assert_eq!(store.get(), 2);
        assert_eq!(last_seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_update_returns_closure_result() {
        let store = Store::new(vec![3, 1, 2]);
        let removed = store.update(|v| v.pop());
        assert_eq!(removed, Some(2));
    }
}
