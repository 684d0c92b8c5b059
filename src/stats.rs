//! Per-shard counters and load snapshots.

#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one shard as of a [`crate::ShardMap::stats`] call.
///
/// Only the `metrics` feature fills these in; without it every field is 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardOps {
    /// `get` calls that returned a value.
    pub reads: u64,
    /// `insert` calls plus `update` calls that found their key.
    pub writes: u64,
    /// `remove` calls that took a value out.
    pub removes: u64,
    /// Times the shard lock was taken, shared or exclusive. Every map
    /// operation that touches the shard counts once, `len` and `range`
    /// included.
    pub lock_acquisitions: u64,
}

/// Relaxed atomic counters living next to a shard's lock.
#[cfg(feature = "metrics")]
pub(crate) struct ShardStats {
    reads: AtomicU64,
    writes: AtomicU64,
    removes: AtomicU64,
    lock_acquisitions: AtomicU64,
}

#[cfg(feature = "metrics")]
impl ShardStats {
    pub fn new() -> Self {
        Self {
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            removes: AtomicU64::new(0),
            lock_acquisitions: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_remove(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_lock_acquisition(&self) {
        self.lock_acquisitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ShardOps {
        ShardOps {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            lock_acquisitions: self.lock_acquisitions.load(Ordering::Relaxed),
        }
    }
}

// Without `metrics` the counters compile away.
#[cfg(not(feature = "metrics"))]
pub(crate) struct ShardStats;

#[cfg(not(feature = "metrics"))]
impl ShardStats {
    pub fn new() -> Self {
        ShardStats
    }

    #[inline]
    pub fn record_read(&self) {}

    #[inline]
    pub fn record_write(&self) {}

    #[inline]
    pub fn record_remove(&self) {}

    #[inline]
    pub fn record_lock_acquisition(&self) {}

    pub fn snapshot(&self) -> ShardOps {
        ShardOps::default()
    }
}

/// Sizes and counters gathered shard by shard.
///
/// Shards are read one after another, so under concurrent writes the sizes
/// do not describe a single instant.
///
/// Reading a shard's size takes its lock, so each call also adds one to every
/// shard's `lock_acquisitions`.
#[derive(Debug, Clone)]
pub struct Stats {
    /// Total number of entries across all shards.
    pub size: usize,
    /// Number of entries in each shard, by shard index.
    pub shard_sizes: Vec<usize>,
    /// Operation counts for each shard, by shard index.
    pub operations: Vec<ShardOps>,
}

impl Stats {
    /// Average number of entries per shard.
    pub fn avg_load(&self) -> f64 {
        if self.shard_sizes.is_empty() {
            return 0.0;
        }
        self.size as f64 / self.shard_sizes.len() as f64
    }

    /// Largest shard size divided by the average. `1.0` is a perfect spread;
    /// an empty map reports `0.0`.
    pub fn max_load_ratio(&self) -> f64 {
        let avg = self.avg_load();
        if avg == 0.0 {
            return 0.0;
        }
        let max = self.shard_sizes.iter().copied().max().unwrap_or(0);
        max as f64 / avg
    }
}
