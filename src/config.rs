use crate::error::Error;
use crate::hash::{DefaultHash, HashFn, ShardHasher};
use crate::shards::{default_shard_count, round_up_pow2};
use std::hash::Hash;
use std::sync::Arc;

/// Configuration for a ShardMap instance.
///
/// A fresh config uses [`default_shard_count`] shards. [`Config::new`] starts
/// with the built-in hasher for `K`; [`Config::custom`] starts with none, for
/// key types that have no built-in hasher and must be given one with
/// [`Config::hasher`] before building.
pub struct Config<K> {
    pub(crate) shard_count: usize,
    pub(crate) hasher: Option<ShardHasher<K>>,
    pub(crate) capacity_per_shard: Option<usize>,
}

impl<K: DefaultHash> Config<K> {
    /// Create a new config with the default shard count and the built-in
    /// hasher for `K`.
    pub fn new() -> Self {
        Self::custom().default_hasher()
    }
}

impl<K> Config<K> {
    /// Create a new config with the default shard count and no hasher.
    pub fn custom() -> Self {
        Self {
            shard_count: default_shard_count(),
            hasher: None,
            capacity_per_shard: None,
        }
    }

    /// Set the number of shards. The hint is rounded up to a power of two;
    /// `0` and `1` both mean a single shard.
    pub fn shard_count(mut self, hint: usize) -> Self {
        self.shard_count = round_up_pow2(hint);
        self
    }

    /// Route keys with a custom hash function.
    pub fn hasher<F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> u64 + Send + Sync + 'static,
    {
        self.hasher = Some(ShardHasher::Custom(Arc::new(f)));
        self
    }

    /// Route keys with an already shared [`HashFn`].
    pub fn hash_fn(mut self, f: HashFn<K>) -> Self {
        self.hasher = Some(ShardHasher::Custom(f));
        self
    }

    /// Route keys with the built-in hasher for `K`.
    pub fn default_hasher(mut self) -> Self
    where
        K: DefaultHash,
    {
        self.hasher = Some(ShardHasher::default_for());
        self
    }

    /// Set initial capacity per shard. Total capacity will be approximately
    /// `capacity_per_shard * shard_count`.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.capacity_per_shard = Some(capacity);
        self
    }
}

impl<K: DefaultHash> Default for Config<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for Config<K> {
    fn clone(&self) -> Self {
        Self {
            shard_count: self.shard_count,
            hasher: self.hasher.clone(),
            capacity_per_shard: self.capacity_per_shard,
        }
    }
}

impl<K> std::fmt::Debug for Config<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("shard_count", &self.shard_count)
            .field("hasher", &self.hasher)
            .field("capacity_per_shard", &self.capacity_per_shard)
            .finish()
    }
}

/// Builder for creating a ShardMap with custom configuration.
///
/// ```rust
/// use shmap::ShardMapBuilder;
///
/// let map = ShardMapBuilder::<(u32, u32)>::custom()
///     .shard_count(100)
///     .hasher(|&(a, b)| shmap::hash::mix64(((a as u64) << 32) | b as u64))
///     .build::<&str>()?;
/// assert_eq!(map.shard_count(), 128);
/// # Ok::<(), shmap::Error>(())
/// ```
#[derive(Debug)]
pub struct ShardMapBuilder<K> {
    config: Config<K>,
}

impl<K: DefaultHash> ShardMapBuilder<K> {
    /// Create a new builder using the built-in hasher for `K`.
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }
}

impl<K> ShardMapBuilder<K> {
    /// Create a new builder with no hasher. One must be set with
    /// [`ShardMapBuilder::hasher`] or [`ShardMapBuilder::hash_fn`] before
    /// [`ShardMapBuilder::build`] can succeed.
    pub fn custom() -> Self {
        Self {
            config: Config::custom(),
        }
    }

    /// Set the number of shards, rounded up to a power of two.
    pub fn shard_count(mut self, hint: usize) -> Self {
        self.config = self.config.shard_count(hint);
        self
    }

    /// Route keys with a custom hash function.
    pub fn hasher<F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> u64 + Send + Sync + 'static,
    {
        self.config = self.config.hasher(f);
        self
    }

    /// Route keys with an already shared [`HashFn`].
    pub fn hash_fn(mut self, f: HashFn<K>) -> Self {
        self.config = self.config.hash_fn(f);
        self
    }

    /// Route keys with the built-in hasher for `K`.
    pub fn default_hasher(mut self) -> Self
    where
        K: DefaultHash,
    {
        self.config = self.config.default_hasher();
        self
    }

    /// Set initial capacity per shard.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.config = self.config.capacity_per_shard(capacity);
        self
    }

    /// Build a ShardMap with the configured settings.
    ///
    /// Fails with [`Error::MissingHasher`] if the builder was started with
    /// [`ShardMapBuilder::custom`] and no hasher was set.
    pub fn build<V>(self) -> Result<crate::ShardMap<K, V>, Error>
    where
        K: Hash + Eq + Send + Sync,
        V: Send + Sync,
    {
        crate::ShardMap::with_config(self.config)
    }
}

impl<K: DefaultHash> Default for ShardMapBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
