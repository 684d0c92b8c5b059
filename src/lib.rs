//! # shmap
//!
//! A lock-sharded concurrent map.
//!
//! shmap splits the key space across a fixed, power-of-two number of shards,
//! each an ordinary hash map behind its own read-write lock. A key is routed
//! with `hash(key) & (shards - 1)`, so operations on different shards never
//! contend and there is no global lock anywhere.
//!
//! ## Features
//!
//! - **Sharded locking**: one `RwLock` per shard, many readers or one writer
//! - **Allocation-free hashing**: built-in hashers for strings, integers and
//!   floats, with a SplitMix64 finalizer for integer keys
//! - **Custom keys**: any `Hash + Eq` key works with a caller-supplied hasher
//! - **Sized for the host**: the default shard count follows available
//!   parallelism
//! - **Statistics**: per-shard load and, with `metrics`, operation counts
//!
//! ## Example
//!
//! ```rust
//! use shmap::ShardMap;
//! use std::ops::ControlFlow;
//!
//! let map = ShardMap::new();
//!
//! map.insert("key1", 1);
//! map.insert("key2", 2);
//!
//! if let Some(value) = map.get(&"key1") {
//!     println!("Found: {}", *value);
//! }
//!
//! map.remove(&"key2");
//! map.remove(&"missing"); // no-op
//!
//! map.range(|key, value| {
//!     println!("{}: {}", key, value);
//!     ControlFlow::Continue(())
//! });
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use shmap::{hash, ShardMapBuilder};
//!
//! let map = ShardMapBuilder::<(String, u16)>::custom()
//!     .shard_count(100) // rounded up to 128
//!     .hash_fn(hash::ahash_hasher())
//!     .capacity_per_shard(16)
//!     .build::<i32>()?;
//! assert_eq!(map.shard_count(), 128);
//! # Ok::<(), shmap::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
pub mod hash;
mod shard;
/// Main ShardMap implementation.
pub mod shardmap;
pub mod shards;
pub mod stats;

// Re-export main types
pub use config::{Config, ShardMapBuilder};
pub use error::Error;
pub use hash::{DefaultHash, FloatKey, HashFn};
pub use shardmap::ShardMap;
pub use stats::{ShardOps, Stats};
