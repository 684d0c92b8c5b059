use crate::stats::ShardStats;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::hash::Hash;
use std::ops::ControlFlow;
use std::sync::Arc;

/// A single shard: one HashMap behind its own read-write lock.
///
/// Every method takes the lock for the duration of one container operation
/// and releases it before returning.
pub(crate) struct Shard<K, V> {
    map: RwLock<HashMap<K, Arc<V>>>,
    stats: ShardStats,
}

impl<K, V> Shard<K, V>
where
    K: Hash + Eq,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RwLock::new(HashMap::with_capacity(capacity)),
            stats: ShardStats::new(),
        }
    }

    /// Insert or overwrite, returning the previous value if any.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let mut map = self.map.write();
        self.stats.record_lock_acquisition();
        self.stats.record_write();
        map.insert(key, Arc::new(value))
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let map = self.map.read();
        self.stats.record_lock_acquisition();
        let result = map.get(key).cloned();
        if result.is_some() {
            self.stats.record_read();
        }
        result
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let map = self.map.read();
        self.stats.record_lock_acquisition();
        map.contains_key(key)
    }

    /// Remove a key, returning its value if it existed.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut map = self.map.write();
        self.stats.record_lock_acquisition();
        let result = map.remove(key);
        if result.is_some() {
            self.stats.record_remove();
        }
        result
    }

    /// Mutate a value in place, returning the new value if the key existed.
    ///
    /// `Arc::make_mut` clones the value first when a caller still holds a
    /// reference to it, so earlier `get` results never change under them.
    pub fn update<F>(&self, key: &K, f: F) -> Option<Arc<V>>
    where
        F: FnOnce(&mut V),
        V: Clone,
    {
        let mut map = self.map.write();
        self.stats.record_lock_acquisition();
        let slot = map.get_mut(key)?;
        f(Arc::make_mut(slot));
        self.stats.record_write();
        Some(Arc::clone(slot))
    }

    /// Visit every entry under the shared lock. Returns `Break` as soon as the
    /// visitor does; the lock is dropped on return either way.
    pub fn range<F>(&self, f: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        let map = self.map.read();
        self.stats.record_lock_acquisition();
        for (key, value) in map.iter() {
            f(key, value.as_ref())?;
        }
        ControlFlow::Continue(())
    }

    pub fn clear(&self) {
        let mut map = self.map.write();
        self.stats.record_lock_acquisition();
        map.clear();
    }

    pub fn len(&self) -> usize {
        let map = self.map.read();
        self.stats.record_lock_acquisition();
        map.len()
    }

    pub fn is_empty(&self) -> bool {
        let map = self.map.read();
        self.stats.record_lock_acquisition();
        map.is_empty()
    }

    pub fn stats(&self) -> crate::stats::ShardOps {
        self.stats.snapshot()
    }
}
