//! Shard-count selection.
//!
//! The map always uses a power-of-two number of shards so that routing is a
//! single `hash & mask`. These helpers are pure except for
//! [`default_shard_count`], which asks the host for its parallelism.

/// Lower bound of the default shard count.
pub const MIN_DEFAULT_SHARDS: usize = 64;

/// Upper bound of the default shard count.
pub const MAX_DEFAULT_SHARDS: usize = 1024;

/// Shards per unit of available parallelism before clamping.
pub const SHARDS_PER_CPU: usize = 8;

/// Round `count` up to the next power of two.
///
/// `0` and `1` both yield `1` (a single shard, i.e. one lock). A power of two
/// is returned unchanged. Otherwise the result is at least `count`, except
/// above `1 << (usize::BITS - 1)`: such values saturate to that power of two,
/// which is smaller than `count`.
///
/// ```rust
/// use shmap::shards::round_up_pow2;
///
/// assert_eq!(round_up_pow2(0), 1);
/// assert_eq!(round_up_pow2(64), 64);
/// assert_eq!(round_up_pow2(100), 128);
/// ```
pub fn round_up_pow2(count: usize) -> usize {
    if count <= 1 {
        return 1;
    }
    count
        .checked_next_power_of_two()
        .unwrap_or(1 << (usize::BITS - 1))
}

/// Default shard count for a host with `parallelism` execution units:
/// `clamp(round_up_pow2(parallelism * 8), 64, 1024)`.
pub fn default_shard_count_for(parallelism: usize) -> usize {
    let target = parallelism.saturating_mul(SHARDS_PER_CPU);
    round_up_pow2(target).clamp(MIN_DEFAULT_SHARDS, MAX_DEFAULT_SHARDS)
}

/// Default shard count for this process, derived from
/// [`std::thread::available_parallelism`].
pub fn default_shard_count() -> usize {
    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or_else(|err| {
            log::warn!("failed to detect available parallelism, assuming 1: {err}");
            1
        });
    default_shard_count_for(parallelism)
}
