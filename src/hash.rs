//! Key hashing for shard routing.
//!
//! Every hasher here is a pure function from a key to a `u64` and never
//! allocates. Primitive keys (strings, integers, floats) get a built-in hasher
//! through [`DefaultHash`]; any other key type must be given a [`HashFn`].

use std::hash::Hash;
use std::sync::Arc;

/// A custom hash function. Must be deterministic for the lifetime of the map
/// and safe to call from many threads at once.
pub type HashFn<K> = Arc<dyn Fn(&K) -> u64 + Send + Sync>;

// One digit shorter than the published FNV-1a basis (14695981039346656037).
// Kept as is so shard placement of string keys stays stable.
const FNV_OFFSET_BASIS: u64 = 1469598103934665603;
const FNV_PRIME: u64 = 1099511628211;

/// SplitMix64 finalizer. Spreads low-entropy inputs such as small sequential
/// integers across all 64 bits.
#[inline]
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}

/// FNV-1a over the UTF-8 bytes of `s`.
#[inline]
pub fn string_hash(s: &str) -> u64 {
    bytes_hash(s.as_bytes())
}

/// FNV-1a over a byte slice.
#[inline]
pub fn bytes_hash(bytes: &[u8]) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    for &b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Hash a signed integer, already sign-extended to 64 bits.
#[inline]
pub fn int_hash(v: i64) -> u64 {
    mix64(v as u64)
}

/// Hash an unsigned integer, already zero-extended to 64 bits.
#[inline]
pub fn uint_hash(v: u64) -> u64 {
    mix64(v)
}

/// Hash an `f32` by its canonical bit pattern (see [`FloatKey`]).
#[inline]
pub fn f32_hash(v: f32) -> u64 {
    mix64(u64::from(canonical_f32_bits(v)))
}

/// Hash an `f64` by its canonical bit pattern (see [`FloatKey`]).
#[inline]
pub fn f64_hash(v: f64) -> u64 {
    mix64(canonical_f64_bits(v))
}

// -0.0 folds into +0.0 and every NaN payload folds into one quiet NaN, so
// values that compare equal as keys always land on the same shard.
#[inline]
fn canonical_f32_bits(v: f32) -> u32 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f32::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

#[inline]
fn canonical_f64_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

/// Key types with a built-in, allocation-free shard hasher.
///
/// Implemented for strings, every integer width and floats. A key type
/// without an implementation has no default hasher: pass a [`HashFn`] through
/// `ShardMap::with_hasher` or the builder instead.
pub trait DefaultHash {
    /// Hash this key to a well-distributed `u64`.
    fn default_hash(&self) -> u64;
}

impl DefaultHash for str {
    #[inline]
    fn default_hash(&self) -> u64 {
        string_hash(self)
    }
}

impl DefaultHash for String {
    #[inline]
    fn default_hash(&self) -> u64 {
        string_hash(self)
    }
}

impl DefaultHash for Box<str> {
    #[inline]
    fn default_hash(&self) -> u64 {
        string_hash(self)
    }
}

impl DefaultHash for Arc<str> {
    #[inline]
    fn default_hash(&self) -> u64 {
        string_hash(self)
    }
}

impl<T: DefaultHash + ?Sized> DefaultHash for &T {
    #[inline]
    fn default_hash(&self) -> u64 {
        (**self).default_hash()
    }
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(
            impl DefaultHash for $t {
                #[inline]
                fn default_hash(&self) -> u64 {
                    int_hash(*self as i64)
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {
        $(
            impl DefaultHash for $t {
                #[inline]
                fn default_hash(&self) -> u64 {
                    uint_hash(*self as u64)
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl DefaultHash for f32 {
    #[inline]
    fn default_hash(&self) -> u64 {
        f32_hash(*self)
    }
}

impl DefaultHash for f64 {
    #[inline]
    fn default_hash(&self) -> u64 {
        f64_hash(*self)
    }
}

/// A float usable as a map key.
///
/// Equality and hashing both use the canonical bit pattern: `-0.0` equals
/// `0.0`, and all NaNs equal each other. Every other value compares by its
/// exact bits.
///
/// ```rust
/// use shmap::{FloatKey, ShardMap};
///
/// let map = ShardMap::new();
/// map.insert(FloatKey(-0.0f64), "zero");
/// assert_eq!(*map.get(&FloatKey(0.0)).unwrap(), "zero");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatKey<F>(
    /// The wrapped float.
    pub F,
);

macro_rules! impl_float_key {
    ($t:ty, $canon:ident, $hash:ident) => {
        impl PartialEq for FloatKey<$t> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                $canon(self.0) == $canon(other.0)
            }
        }

        impl Eq for FloatKey<$t> {}

        impl Hash for FloatKey<$t> {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                $canon(self.0).hash(state);
            }
        }

        impl DefaultHash for FloatKey<$t> {
            #[inline]
            fn default_hash(&self) -> u64 {
                $hash(self.0)
            }
        }

        impl From<$t> for FloatKey<$t> {
            fn from(v: $t) -> Self {
                FloatKey(v)
            }
        }
    };
}

impl_float_key!(f32, canonical_f32_bits, f32_hash);
impl_float_key!(f64, canonical_f64_bits, f64_hash);

// Fixed seeds keep the hash stable across maps and process runs.
const AHASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// A deterministic [`HashFn`] for any `Hash` key, built on ahash with fixed
/// seeds. Intended for composite keys that have no [`DefaultHash`].
pub fn ahash_hasher<K>() -> HashFn<K>
where
    K: Hash + 'static,
{
    let state = ahash::RandomState::with_seeds(
        AHASH_SEEDS[0],
        AHASH_SEEDS[1],
        AHASH_SEEDS[2],
        AHASH_SEEDS[3],
    );
    Arc::new(move |key: &K| state.hash_one(key))
}

/// A [`HashFn`] for any `Hash` key, built on fxhash.
#[cfg(feature = "fxhash")]
pub fn fx_hasher<K>() -> HashFn<K>
where
    K: Hash + 'static,
{
    Arc::new(|key: &K| mix64(fxhash::hash64(key)))
}

/// Hash function used for shard assignment.
/// Uses an enum so the built-in hashers dispatch through a plain fn pointer.
pub(crate) enum ShardHasher<K> {
    /// Built-in hasher resolved from [`DefaultHash`].
    Default(fn(&K) -> u64),
    /// Caller-supplied hasher.
    Custom(HashFn<K>),
}

impl<K> ShardHasher<K> {
    pub(crate) fn default_for() -> Self
    where
        K: DefaultHash,
    {
        ShardHasher::Default(<K as DefaultHash>::default_hash)
    }

    /// Hash a key to determine which shard it belongs to.
    #[inline]
    pub(crate) fn hash_key(&self, key: &K) -> u64 {
        match self {
            ShardHasher::Default(f) => f(key),
            ShardHasher::Custom(f) => f(key),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ShardHasher::Default(_) => "default",
            ShardHasher::Custom(_) => "custom",
        }
    }
}

impl<K> Clone for ShardHasher<K> {
    fn clone(&self) -> Self {
        match self {
            ShardHasher::Default(f) => ShardHasher::Default(*f),
            ShardHasher::Custom(f) => ShardHasher::Custom(Arc::clone(f)),
        }
    }
}

impl<K> std::fmt::Debug for ShardHasher<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ShardHasher::{}", self.kind())
    }
}
