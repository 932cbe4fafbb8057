//! FksMap: a static collision-free hash map.
//!
//! Implemented with FKS two-tiered hashing: a coarse top-level hash
//! partitions the keys into buckets, and each bucket carries a
//! quadratically-sized second-level table whose hash is redrawn until it is
//! collision-free. Lookups are therefore worst-case O(1), with no probing
//! and no chaining, regardless of the key distribution.
//!
//! The key set is fixed at construction. Only the value stored for an
//! existing key may change afterwards, through [`FksMap::get_mut`] or
//! [`FksMap::get_unchecked_mut`].

use crate::bucket::Bucket;
use crate::error::FksError;
use crate::hash::{ceil_log2, HashFamily, MulShiftHash, MulShiftKey};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::marker::PhantomData;

/// Upper bound on per-bucket rehash attempts during construction.
///
/// A fresh draw from the family is collision-free with probability at least
/// 1/2 once the table holds `n^2` slots, so the loop finishes in a couple of
/// attempts in expectation. Reaching this bound means the hash family or
/// the random source behind it is degenerate, and construction fails with
/// [`FksError::RehashLimitExceeded`] instead of spinning.
const MAX_REHASH_ATTEMPTS: usize = 100;

/// Static collision-free hash map over a key set fixed at construction.
///
/// Features:
/// - Worst-case O(1) checked lookups that verify the stored key
/// - An `unsafe` unchecked fast path with no bounds check and no comparison
/// - In-place value updates for present keys
/// - Expected O(n) construction via Las Vegas rehashing
///
/// Generic Parameters:
/// - `K`: Key type (integers out of the box; anything with a [`HashFamily`])
/// - `V`: Value type (unconstrained; empty slots are `None`, not defaults)
/// - `H`: Hash family (defaults to the multiply-shift family for integers)
#[derive(Clone)]
pub struct FksMap<K, V, H = MulShiftHash<K>>
where
    K: Clone + Eq + fmt::Debug,
    H: HashFamily<K>,
{
    hash: H,
    buckets: Vec<Bucket<K, V, H>>,
    keys: Vec<K>, // distinct keys, first-occurrence order
}

// Implementation for the default integer family
impl<K, V> FksMap<K, V>
where
    K: MulShiftKey + Clone + Eq + fmt::Debug,
{
    /// Builds a map from an ordered sequence of pairs, seeding every hash
    /// instance from OS entropy.
    ///
    /// Duplicate keys are allowed; the last occurrence wins. An empty input
    /// yields a degenerate map on which every checked lookup misses.
    pub fn new<I>(pairs: I) -> Result<Self, FksError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::with_source(pairs, &mut StdRng::from_entropy())
    }
}

// Implementation for all hash families
impl<K, V, H> FksMap<K, V, H>
where
    K: Clone + Eq + fmt::Debug,
    H: HashFamily<K>,
{
    /// Builds a map drawing all randomness from `source`.
    ///
    /// The injected source seeds the top-level hash and every bucket hash,
    /// so an identical seed reproduces the exact table layout. Tests use
    /// this to pin down structure; callers who just want a map should reach
    /// for [`FksMap::new`].
    ///
    /// Construction is a single sequential pass: partition the pairs by the
    /// top-level hash, then redraw each non-empty bucket's hash until one
    /// places that bucket's keys without collision. With `n_i` keys in a
    /// bucket of `>= n_i^2` slots a draw succeeds with probability at least
    /// 1/2, so the expected total work is O(n). A retry cap guards against
    /// degenerate sources; see [`FksError::RehashLimitExceeded`].
    pub fn with_source<I>(pairs: I, source: &mut dyn RngCore) -> Result<Self, FksError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let exponent = ceil_log2(pairs.len());
        let hash = H::draw(exponent, source);

        // Partition into per-bucket pending lists. A duplicate key lands in
        // the same list as its earlier occurrence and replaces the pending
        // value (last write wins), which also keeps the collision probe
        // terminating: it only ever sees distinct keys.
        let mut groups: Vec<Vec<(K, V)>> = (0..1usize << exponent).map(|_| Vec::new()).collect();
        let mut keys = Vec::new();
        for (key, value) in pairs {
            let group = &mut groups[hash.index(&key)];
            match group.iter_mut().find(|(pending, _)| *pending == key) {
                Some(pending) => pending.1 = value,
                None => {
                    keys.push(key.clone());
                    group.push((key, value));
                }
            }
        }

        // One scratch buffer serves every bucket's collision probe.
        let mut scratch = Vec::new();
        let mut buckets = Vec::with_capacity(groups.len());
        for (index, group) in groups.into_iter().enumerate() {
            let bucket = if group.is_empty() {
                Bucket::empty(source)
            } else {
                Bucket::build(group, source, &mut scratch, MAX_REHASH_ATTEMPTS).map_err(
                    |attempts| FksError::RehashLimitExceeded {
                        bucket: index,
                        attempts,
                    },
                )?
            };
            buckets.push(bucket);
        }

        Ok(FksMap {
            hash,
            buckets,
            keys,
        })
    }

    /// Checked lookup with zero-allocation error handling.
    ///
    /// Two hash evaluations and one key comparison, independent of the key
    /// distribution. Misses for keys that were not part of the construction
    /// input, including near-misses that land on an occupied slot.
    #[inline(always)]
    pub fn get(&self, key: &K) -> Result<&V, FksError> {
        self.buckets[self.hash.index(key)]
            .get(key)
            .ok_or(FksError::KeyNotFoundFast)
    }

    /// Checked lookup with a detailed error (slower on the miss path due to
    /// string formatting).
    pub fn get_detailed(&self, key: &K) -> Result<&V, FksError> {
        self.buckets[self.hash.index(key)]
            .get(key)
            .ok_or_else(|| FksError::KeyNotFound {
                key: format!("{:?}", key),
            })
    }

    /// Checked mutable access to the value stored for `key`.
    ///
    /// Assigning through the returned reference updates the value in place;
    /// the key set, hash parameters and table shape never change.
    #[inline(always)]
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V, FksError> {
        let bucket = self.hash.index(key);
        self.buckets[bucket]
            .get_mut(key)
            .ok_or(FksError::KeyNotFoundFast)
    }

    /// Unchecked lookup: no bounds check, no key comparison, no branch on
    /// the result.
    ///
    /// This is the deliberate fast path and must stay unchecked; use
    /// [`get`](Self::get) whenever presence is uncertain.
    ///
    /// # Safety
    ///
    /// `key` must have been part of the construction input. Looking up any
    /// other key is undefined behavior.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, key: &K) -> &V {
        // SAFETY: the top-level index is always < buckets.len(), and the
        // caller guarantees the key was placed in that bucket.
        let bucket = self.buckets.get_unchecked(self.hash.index(key));
        bucket.get_unchecked(key)
    }

    /// Mutable variant of [`get_unchecked`](Self::get_unchecked), used for
    /// in-place value updates on the fast path.
    ///
    /// # Safety
    ///
    /// Same as [`get_unchecked`](Self::get_unchecked).
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, key: &K) -> &mut V {
        let index = self.hash.index(key);
        // SAFETY: see `get_unchecked`.
        let bucket = self.buckets.get_unchecked_mut(index);
        bucket.get_unchecked_mut(key)
    }

    /// Check if a key is in the map (accurate, no false positives).
    #[inline(always)]
    pub fn contains_key(&self, key: &K) -> bool {
        self.buckets[self.hash.index(key)].get(key).is_some()
    }

    /// Number of distinct keys in the map.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The map's keys in first-occurrence order of the construction input.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    /// The stored values, in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.entries().map(|(_, value)| value))
    }

    /// Key-value pairs in first-occurrence key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys.iter().map(move |key| {
            let value = self.buckets[self.hash.index(key)]
                .get(key)
                .unwrap_or_else(|| unreachable!("recorded key missing from its bucket"));
            (key, value)
        })
    }

    /// Total slot count across the top level and all second-level tables.
    ///
    /// The top level holds the next power of two >= n buckets and each
    /// bucket with `n_i` keys holds O(n_i^2) slots, so this stays linear in
    /// expectation over the top-level draw.
    pub fn capacity(&self) -> usize {
        self.buckets.len() + self.buckets.iter().map(|b| b.capacity()).sum::<usize>()
    }

    /// Returns the approximate **directly owned** memory usage in bytes.
    ///
    /// Counts the key list and slot arrays by their element sizes; heap data
    /// behind keys or values (e.g. `String` contents) is not included.
    pub fn memory_usage_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.keys.capacity() * std::mem::size_of::<K>()
            + self
                .buckets
                .iter()
                .map(|b| b.capacity() * std::mem::size_of::<Option<(K, V)>>())
                .sum::<usize>()
    }
}

/// Builder for constructing FksMap instances.
///
/// Entries keep their insertion order, so duplicate keys resolve the same
/// way they do for [`FksMap::new`]: last write wins.
pub struct FksMapBuilder<K, V, H = MulShiftHash<K>> {
    pairs: Vec<(K, V)>,
    _phantom: PhantomData<H>,
}

impl<K, V, H> FksMapBuilder<K, V, H>
where
    K: Clone + Eq + fmt::Debug,
    H: HashFamily<K>,
{
    pub fn new() -> Self {
        Self {
            pairs: Vec::new(),
            _phantom: PhantomData,
        }
    }

    pub fn insert(mut self, key: K, value: V) -> Self {
        self.pairs.push((key, value));
        self
    }

    pub fn extend<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.pairs.extend(iter);
        self
    }

    pub fn with_entries<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            pairs: Vec::from_iter(iter),
            _phantom: PhantomData,
        }
    }

    pub fn build(self) -> Result<FksMap<K, V, H>, FksError> {
        FksMap::with_source(self.pairs, &mut StdRng::from_entropy())
    }

    /// Builds drawing all randomness from `source`; see
    /// [`FksMap::with_source`].
    pub fn build_with_source(self, source: &mut dyn RngCore) -> Result<FksMap<K, V, H>, FksError> {
        FksMap::with_source(self.pairs, source)
    }
}

impl<K, V, H> Default for FksMapBuilder<K, V, H>
where
    K: Clone + Eq + fmt::Debug,
    H: HashFamily<K>,
{
    fn default() -> Self {
        Self::new()
    }
}
