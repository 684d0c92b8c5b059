use crate::config::Config;
use crate::error::Error;
use crate::hash::{DefaultHash, HashFn, ShardHasher};
use crate::shard::Shard;
use crate::shards::{default_shard_count, round_up_pow2};
use crate::stats::{ShardOps, Stats};
use std::hash::Hash;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Concurrent map split into independently locked shards.
///
/// Every key is routed to exactly one shard by `hash(key) & mask`, where the
/// shard count is a power of two fixed at construction. Reads take that
/// shard's shared lock, writes take its exclusive lock, and no operation ever
/// locks more than one shard at a time. Values are stored behind `Arc<V>` so
/// readers can keep them after the lock is released.
///
/// # Example
///
/// ```rust
/// use shmap::ShardMap;
///
/// let map = ShardMap::with_shards(100);
/// assert_eq!(map.shard_count(), 128);
///
/// map.insert("key1", 1);
/// assert_eq!(*map.get(&"key1").unwrap(), 1);
/// ```
pub struct ShardMap<K, V> {
    shards: Box<[Shard<K, V>]>,
    mask: u64,
    hash: ShardHasher<K>,
}

impl<K, V> ShardMap<K, V>
where
    K: Hash + Eq + Send + Sync + DefaultHash,
    V: Send + Sync,
{
    /// Create a new map with the default shard count and the built-in hasher
    /// for `K`.
    pub fn new() -> Self {
        Self::from_parts(default_shard_count(), ShardHasher::default_for(), None)
    }

    /// Create a new map with `hint` shards, rounded up to a power of two.
    ///
    /// ```rust
    /// use shmap::ShardMap;
    ///
    /// assert_eq!(ShardMap::<u64, ()>::with_shards(0).shard_count(), 1);
    /// assert_eq!(ShardMap::<u64, ()>::with_shards(64).shard_count(), 64);
    /// ```
    pub fn with_shards(hint: usize) -> Self {
        Self::from_parts(round_up_pow2(hint), ShardHasher::default_for(), None)
    }
}

impl<K, V> ShardMap<K, V>
where
    K: Hash + Eq + Send + Sync,
    V: Send + Sync,
{
    /// Create a new map with the default shard count and a custom hasher.
    ///
    /// This is the way to use key types without a built-in hasher.
    ///
    /// ```rust
    /// use shmap::ShardMap;
    ///
    /// #[derive(Hash, PartialEq, Eq)]
    /// struct Point { x: i32, y: i32 }
    ///
    /// let map = ShardMap::with_hasher(|p: &Point| shmap::hash::int_hash((p.x as i64) << 32 | p.y as i64));
    /// map.insert(Point { x: 1, y: 2 }, "a");
    /// assert!(map.contains_key(&Point { x: 1, y: 2 }));
    /// ```
    pub fn with_hasher<F>(f: F) -> Self
    where
        F: Fn(&K) -> u64 + Send + Sync + 'static,
    {
        Self::from_parts(
            default_shard_count(),
            ShardHasher::Custom(Arc::new(f)),
            None,
        )
    }

    /// Like [`ShardMap::with_hasher`], but for a hasher that may be unset.
    ///
    /// Fails with [`Error::InvalidHasher`] when `hasher` is `None`.
    pub fn try_with_hasher(hasher: Option<HashFn<K>>) -> Result<Self, Error> {
        let hasher = hasher.ok_or(Error::InvalidHasher)?;
        Ok(Self::from_parts(
            default_shard_count(),
            ShardHasher::Custom(hasher),
            None,
        ))
    }

    /// Create a new map with custom config.
    ///
    /// Fails with [`Error::MissingHasher`] when the config has no hasher, which
    /// only happens for a config started with [`Config::custom`].
    pub fn with_config(config: Config<K>) -> Result<Self, Error> {
        let hash = config.hasher.ok_or(Error::MissingHasher)?;
        Ok(Self::from_parts(
            config.shard_count,
            hash,
            config.capacity_per_shard,
        ))
    }

    // `shard_count` must already be a power of two.
    fn from_parts(shard_count: usize, hash: ShardHasher<K>, capacity: Option<usize>) -> Self {
        debug_assert!(shard_count.is_power_of_two());
        let capacity = capacity.unwrap_or(0);
        let shards: Box<[Shard<K, V>]> = (0..shard_count)
            .map(|_| Shard::with_capacity(capacity))
            .collect();

        log::debug!(
            "created shard map: shards={} hasher={} capacity_per_shard={}",
            shard_count,
            hash.kind(),
            capacity
        );

        Self {
            shards,
            mask: (shard_count - 1) as u64,
            hash,
        }
    }

    /// Figure out which shard this key belongs to.
    #[inline]
    fn shard_index(&self, key: &K) -> usize {
        (self.hash.hash_key(key) & self.mask) as usize
    }

    #[inline]
    fn shard_for(&self, key: &K) -> &Shard<K, V> {
        &self.shards[self.shard_index(key)]
    }

    /// Get a value by key. Returns an `Arc<V>` so you can keep it without
    /// copying after the shard lock is released.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.shard_for(key).get(key)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.shard_for(key).contains_key(key)
    }

    /// Insert or overwrite a value. Returns the old value if the key existed.
    ///
    /// ```rust
    /// use shmap::ShardMap;
    ///
    /// let map = ShardMap::new();
    /// assert!(map.insert("key", "value").is_none());
    /// assert_eq!(*map.insert("key", "new_value").unwrap(), "value");
    /// ```
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let shard_idx = self.shard_index(&key);
        self.shards[shard_idx].insert(key, value)
    }

    /// Remove a key, returning its value if it existed. Removing an absent key
    /// is a no-op.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.shard_for(key).remove(key)
    }

    /// Update a value in place, returning the new value if the key existed.
    ///
    /// Requires `V: Clone` because a value still shared with an earlier `get`
    /// is cloned before being modified.
    ///
    /// ```rust
    /// use shmap::ShardMap;
    ///
    /// let map = ShardMap::new();
    /// map.insert("counter", 0);
    ///
    /// map.update(&"counter", |v| *v += 1);
    /// assert_eq!(*map.get(&"counter").unwrap(), 1);
    /// ```
    pub fn update<F>(&self, key: &K, f: F) -> Option<Arc<V>>
    where
        F: FnOnce(&mut V),
        V: Clone,
    {
        self.shard_for(key).update(key, f)
    }

    /// Visit every entry until `f` returns [`ControlFlow::Break`].
    ///
    /// Shards are visited in index order. Each shard is read-locked only while
    /// its own entries are visited, and never together with another shard, so
    /// the traversal is not a snapshot: entries written to a shard that has
    /// not been reached yet may or may not be seen.
    ///
    /// `f` runs under the shard's shared lock. It must not call back into the
    /// same map (a waiting writer makes that a deadlock), and a slow `f`
    /// stalls writers to that shard.
    ///
    /// ```rust
    /// use shmap::ShardMap;
    /// use std::ops::ControlFlow;
    ///
    /// let map = ShardMap::new();
    /// for i in 0..10u32 {
    ///     map.insert(i, i);
    /// }
    ///
    /// let mut seen = 0;
    /// map.range(|_, _| {
    ///     seen += 1;
    ///     if seen == 3 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(seen, 3);
    /// ```
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        for shard in self.shards.iter() {
            if shard.range(&mut f).is_break() {
                return;
            }
        }
    }

    /// Remove every entry, one shard at a time.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.clear();
        }
    }

    /// Number of shards. Always a power of two.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Total number of entries across all shards.
    ///
    /// Read-locks each shard in turn, so under concurrent writes the result
    /// is approximate.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Number of entries in each shard, by shard index.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.len()).collect()
    }

    /// Get detailed statistics about the map and its shards.
    pub fn stats(&self) -> Stats {
        let shard_sizes = self.shard_loads();
        let operations: Vec<ShardOps> = self.shards.iter().map(|s| s.stats()).collect();
        let size: usize = shard_sizes.iter().sum();

        Stats {
            size,
            shard_sizes,
            operations,
        }
    }
}

impl<K, V> Default for ShardMap<K, V>
where
    K: Hash + Eq + Send + Sync + DefaultHash,
    V: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for ShardMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardMap")
            .field("shards", &self.shards.len())
            .field("mask", &self.mask)
            .field("hash", &self.hash)
            .finish()
    }
}
