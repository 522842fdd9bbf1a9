//! Shared Cache Handle
//!
//! Cloneable handle serializing every operation on a [`CacheStore`] behind
//! one exclusive lock, shared with the background sweeper.

use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheOptions;
use crate::error::Result;
use crate::tasks::spawn_sweeper;

// == Cache ==
/// Fixed-capacity TTL cache, safe to share across threads and tasks.
///
/// Clones share the same storage.
#[derive(Debug)]
pub struct Cache<V> {
    inner: Arc<Mutex<CacheStore<V>>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Cache<V> {
    /// Creates a cache without a background sweeper. Expired entries are
    /// still removed lazily on read, on eviction, or by calling
    /// [`sweep`](Self::sweep).
    ///
    /// # Errors
    /// [`crate::CacheError::MaxSizeIsZero`] when `options.max_size` is zero.
    pub fn new(options: &CacheOptions) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(CacheStore::new(options)?)),
        })
    }

    /// Stores `value` under `key`. A zero `ttl` never expires.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.inner.lock().set(key, value, ttl);
    }

    /// Deletes `key`, returning its value if it had not expired.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Runs one sweeper tick: passes over successive windows of slots
    /// until a pass removes less than a quarter of its window.
    ///
    /// The lock is released between passes. Returns the number of expired
    /// entries removed.
    pub fn sweep(&self) -> usize {
        let mut total = 0;
        loop {
            let (removed, hot) = {
                let mut store = self.inner.lock();
                let removed = store.sweep_window();
                (removed, store.is_hot(removed))
            };
            total += removed;
            if !hot {
                return total;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Slots scanned per sweep pass.
    pub fn window(&self) -> usize {
        self.inner.lock().window()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Handle that does not keep the cache alive.
    pub fn downgrade(&self) -> WeakCache<V> {
        WeakCache {
            inner: Arc::downgrade(&self.inner),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.inner.lock().assert_consistent();
    }
}

impl<V: Clone> Cache<V> {
    /// Returns the value for `key` unless it is absent or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().get(key)
    }

    /// Returns the value for `key`, handing back an expired entry's last
    /// value as it is removed.
    pub fn forced_get(&self, key: &str) -> Option<V> {
        self.inner.lock().forced_get(key)
    }
}

impl<V: Send + 'static> Cache<V> {
    /// Creates a cache and spawns its sweeper on the current tokio runtime.
    ///
    /// The sweeper stops when `shutdown` resolves or when every `Cache`
    /// handle has been dropped. The returned handle belongs to the caller.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn start<F>(options: CacheOptions, shutdown: F) -> Result<(Self, JoinHandle<()>)>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cache = Self::new(&options)?;
        let handle = spawn_sweeper(&cache, options.sweep_interval(), shutdown);
        Ok((cache, handle))
    }
}

// == Weak Cache ==
/// Non-owning cache handle, see [`Cache::downgrade`].
#[derive(Debug)]
pub struct WeakCache<V> {
    inner: Weak<Mutex<CacheStore<V>>>,
}

impl<V> Clone for WeakCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<V> WeakCache<V> {
    /// Returns a strong handle while any `Cache` is still alive.
    pub fn upgrade(&self) -> Option<Cache<V>> {
        self.inner.upgrade().map(|inner| Cache { inner })
    }
}
