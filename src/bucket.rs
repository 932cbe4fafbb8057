//! Second-level tables of the two-tier layout.
//!
//! A bucket holding `n` keys owns `2^ceil(log2(n^2))` slots, enough that a
//! freshly drawn hash places all keys without collision with probability at
//! least 1/2. Finding that hash is the Las Vegas loop in [`Bucket::build`].

use crate::hash::{ceil_log2, HashFamily};
use rand::RngCore;

/// One slot array plus the hash instance that addresses it.
///
/// `None` is the empty-slot marker; a key is present iff its slot holds a
/// pair whose stored key equals it.
#[derive(Clone)]
pub(crate) struct Bucket<K, V, H> {
    hash: H,
    slots: Vec<Option<(K, V)>>,
}

impl<K, V, H> Bucket<K, V, H>
where
    K: Eq,
    H: HashFamily<K>,
{
    /// A bucket no key hashed to. Zero slots, so it costs nothing beyond the
    /// struct itself, and every lookup in it misses.
    pub(crate) fn empty(source: &mut dyn RngCore) -> Self {
        Bucket {
            hash: H::draw(0, source),
            slots: Vec::new(),
        }
    }

    /// Builds a collision-free table for `pairs`, whose keys must be
    /// distinct. On failure returns the number of exhausted rehash attempts.
    ///
    /// `scratch` is the shared probe buffer; it is resized here and reset
    /// with `fill(false)` between attempts rather than reallocated.
    pub(crate) fn build(
        pairs: Vec<(K, V)>,
        source: &mut dyn RngCore,
        scratch: &mut Vec<bool>,
        limit: usize,
    ) -> Result<Self, usize> {
        let exponent = ceil_log2(pairs.len() * pairs.len());
        let capacity = 1usize << exponent;
        let mut hash = H::draw(exponent, source);

        scratch.clear();
        scratch.resize(capacity, false);

        let mut attempts = 0;
        loop {
            let mut collided = false;
            for (key, _) in &pairs {
                let slot = hash.index(key);
                if scratch[slot] {
                    collided = true;
                    break;
                }
                scratch[slot] = true;
            }
            if !collided {
                break;
            }
            attempts += 1;
            if attempts >= limit {
                return Err(attempts);
            }
            scratch.fill(false);
            hash.rehash();
        }

        let mut bucket = Bucket {
            hash,
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
        };
        // The probe above proved this hash collision-free over `pairs`, so
        // each slot is written at most once.
        for pair in pairs {
            bucket.place(pair);
        }
        Ok(bucket)
    }

    /// Unconditional write of `pair` into its slot.
    fn place(&mut self, pair: (K, V)) {
        let slot = self.hash.index(&pair.0);
        self.slots[slot] = Some(pair);
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        match self.slots.get(self.hash.index(key)) {
            Some(Some((stored, value))) if stored == key => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let slot = self.hash.index(key);
        match self.slots.get_mut(slot) {
            Some(Some((stored, value))) if stored == key => Some(value),
            _ => None,
        }
    }

    /// Reads the slot without bounds check or key comparison.
    ///
    /// # Safety
    ///
    /// `key` must have been placed in this bucket during construction.
    #[inline(always)]
    pub(crate) unsafe fn get_unchecked(&self, key: &K) -> &V {
        // SAFETY: for a placed key the hash maps into `slots` and that slot
        // was written during construction, so it is in bounds and occupied.
        let slot = self.slots.get_unchecked(self.hash.index(key));
        &slot.as_ref().unwrap_unchecked().1
    }

    /// Mutable variant of [`get_unchecked`](Self::get_unchecked).
    ///
    /// # Safety
    ///
    /// Same as [`get_unchecked`](Self::get_unchecked).
    #[inline(always)]
    pub(crate) unsafe fn get_unchecked_mut(&mut self, key: &K) -> &mut V {
        let index = self.hash.index(key);
        // SAFETY: see `get_unchecked`.
        let slot = self.slots.get_unchecked_mut(index);
        &mut slot.as_mut().unwrap_unchecked().1
    }

    /// Current slot count.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots, in slot order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = &(K, V)> {
        self.slots.iter().flatten()
    }
}
