//! Snapshot cache with request coalescing.
//!
//! Concurrent requests for the same key share one in-flight fetch instead of
//! each hitting the upstream. Entries expire lazily: a stale entry is only
//! noticed and replaced when the key is next requested. A fetch that fails
//! is never cached.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

struct Entry<V> {
    cell: OnceCell<V>,
    created: Instant,
}

/// Keyed cache where each key holds at most one value and at most one
/// in-flight fetch.
pub struct SnapshotCache<K, V> {
    ttl: Option<Duration>,
    entries: Mutex<HashMap<K, Arc<Entry<V>>>>,
}

impl<K, V> SnapshotCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// A cache whose filled entries expire after `ttl`. `None` keeps
    /// entries until the process exits.
    pub fn new(ttl: Option<Duration>) -> Self {
        SnapshotCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, or run `fetch` to fill it.
    ///
    /// Callers arriving while a fetch is in flight await that same fetch.
    /// Expiry only ever applies to filled entries, so an in-flight fetch is
    /// never duplicated. Entry age is measured from when its fetch started.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let entry = {
            let mut entries = self.lock_entries();
            if let Some(existing) = entries.get(&key) {
                let expired = match self.ttl {
                    Some(ttl) => existing.cell.initialized() && existing.created.elapsed() >= ttl,
                    None => false,
                };
                if expired {
                    entries.remove(&key);
                }
            }
            Arc::clone(entries.entry(key.clone()).or_insert_with(|| {
                Arc::new(Entry {
                    cell: OnceCell::new(),
                    created: Instant::now(),
                })
            }))
        };

        match entry.cell.get_or_try_init(fetch).await {
            Ok(value) => Ok(value.clone()),
            Err(err) => {
                // Drop the failed entry so the next caller starts a fresh
                // fetch with a fresh timestamp. Skip if the slot was already
                // replaced, or if another waiter managed to fill the cell.
                let mut entries = self.lock_entries();
                let is_ours = entries
                    .get(&key)
                    .map(|current| Arc::ptr_eq(current, &entry))
                    .unwrap_or(false);
                if is_ours && !entry.cell.initialized() {
                    entries.remove(&key);
                }
                Err(err)
            }
        }
    }

    /// Number of entries currently held, filled or in flight.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<K, Arc<Entry<V>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> fmt::Debug for SnapshotCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        };
        f.debug_struct("SnapshotCache")
            .field("ttl", &self.ttl)
            .field("entries", &len)
            .finish()
    }
}
