//! Last-value cache with push subscribers.
//!
//! The presentation layer either pulls the latest value with `get` or
//! subscribes and is called back on every `set`.

use std::sync::Arc;

use parking_lot::Mutex;

pub type SubscriptionId = u64;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: Option<T>,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: SubscriptionId,
}

/// Shared observable value. Clones share the same value and subscribers.
pub struct Observable<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Observable<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: None,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn with_value(value: T) -> Self {
        let observable = Self::new();
        observable.inner.lock().value = Some(value);
        observable
    }

    /// Last published value, if any.
    pub fn get(&self) -> Option<T> {
        self.inner.lock().value.clone()
    }

    /// Store a value and notify subscribers.
    ///
    /// Callbacks run after the lock is released, so they may call back into
    /// this observable.
    pub fn set(&self, value: T) {
        let subscribers: Vec<Callback<T>> = {
            let mut inner = self.inner.lock();
            inner.value = Some(value.clone());
            inner.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for cb in subscribers {
            cb(&value);
        }
    }

    /// Register a callback. It is invoked right away with the current value, if one exists.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let (id, current) = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::clone(&callback)));
            (id, inner.value.clone())
        };
        if let Some(value) = current {
            callback(&value);
        }
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}
