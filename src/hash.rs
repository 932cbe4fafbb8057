//! Randomized universal hashing over fixed-width integer keys.
//!
//! The multiply-shift family `h(x) = ((a*x + b) mod 2^w) >> (w - M)` maps a
//! `w`-bit key into `[0, 2^M)`. For a uniformly drawn `(a, b)`, two distinct
//! keys collide with probability at most `2 / 2^M`, which is what the
//! two-level construction in [`crate::map`] relies on.
//!
//! Non-integer key types can plug in their own family by implementing
//! [`HashFamily`]; only the integer specialization ships with the crate.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::marker::PhantomData;

/// Exponent of the smallest power of two that is >= `n` (0 for `n <= 1`).
pub(crate) fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        (n - 1).ilog2() + 1
    }
}

/// A family of randomized hash functions producing indices in `[0, 2^M)`.
///
/// Implementations own their random generator: `draw` seeds it from the
/// caller-supplied source, and every later [`rehash`](Self::rehash) pulls
/// from the internal generator only. This keeps the construction retry loop
/// deterministic under an injected seed.
pub trait HashFamily<K>: Clone {
    /// Draws a fresh member of the family with table-size exponent `exponent`.
    fn draw(exponent: u32, source: &mut dyn RngCore) -> Self;

    /// Redraws the hash parameters without changing the exponent.
    fn rehash(&mut self);

    /// Index of `key`, in `[0, 2^exponent)`.
    fn index(&self, key: &K) -> usize;
}

/// Fixed-width integer keys usable with [`MulShiftHash`].
///
/// The arithmetic intentionally wraps: working modulo `2^w` is what makes
/// the family universal, not an overflow bug.
pub trait MulShiftKey: Copy + Eq {
    /// Bit width `w` of the key type.
    const BITS: u32;

    /// Truncates a raw parameter draw to the key's width and discards its
    /// low `exponent` bits, so the additive term stays in range after the
    /// final shift.
    fn fold_addend(raw: u64, exponent: u32) -> u64;

    /// `((a * self + b) mod 2^w) >> shift`, in the key's width.
    fn mul_shift(self, a: u64, b: u64, shift: u32) -> usize;
}

macro_rules! mul_shift_keys {
    ($($key:ty => $word:ty),+ $(,)?) => {$(
        impl MulShiftKey for $key {
            const BITS: u32 = <$word>::BITS;

            #[inline]
            fn fold_addend(raw: u64, exponent: u32) -> u64 {
                // Widen back to u64 so exponents past the key width are a
                // plain shift instead of an overflow.
                ((raw as $word) as u64) >> exponent.min(63)
            }

            #[inline]
            fn mul_shift(self, a: u64, b: u64, shift: u32) -> usize {
                let x = self as $word;
                (x.wrapping_mul(a as $word).wrapping_add(b as $word) >> shift) as usize
            }
        }
    )+};
}

mul_shift_keys! {
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    usize => usize,
    i8 => u8,
    i16 => u16,
    i32 => u32,
    i64 => u64,
    isize => usize,
}

/// The integer multiply-shift member of the universal family.
///
/// Parameters `a` and `b` are drawn from the instance's own generator; `b`
/// is pre-shifted by the exponent at draw time so `index` is a single
/// multiply, add and shift.
#[derive(Clone)]
pub struct MulShiftHash<K> {
    a: u64,
    b: u64,
    exponent: u32,
    shift: u32,
    rng: StdRng,
    _phantom: PhantomData<K>,
}

impl<K: MulShiftKey> HashFamily<K> for MulShiftHash<K> {
    fn draw(exponent: u32, source: &mut dyn RngCore) -> Self {
        let mut hash = MulShiftHash {
            a: 0,
            b: 0,
            exponent,
            // Exponents past the key width leave the full word as the index;
            // the table is merely larger than the index range needs.
            shift: K::BITS.saturating_sub(exponent),
            rng: StdRng::seed_from_u64(source.next_u64()),
            _phantom: PhantomData,
        };
        hash.rehash();
        hash
    }

    fn rehash(&mut self) {
        self.a = self.rng.gen();
        self.b = K::fold_addend(self.rng.gen(), self.exponent);
    }

    #[inline(always)]
    fn index(&self, key: &K) -> usize {
        if self.exponent == 0 {
            return 0;
        }
        key.mul_shift(self.a, self.b, self.shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_log2_values() {
        assert_eq!(ceil_log2(0), 0);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(9), 4);
        assert_eq!(ceil_log2(1 << 20), 20);
        assert_eq!(ceil_log2((1 << 20) + 1), 21);
    }

    #[test]
    fn index_stays_in_range() {
        let mut source = StdRng::seed_from_u64(7);
        for exponent in 0..12u32 {
            let hash: MulShiftHash<u64> = MulShiftHash::draw(exponent, &mut source);
            for key in 0..1000u64 {
                assert!(hash.index(&key) < 1 << exponent);
            }
        }
    }

    #[test]
    fn narrow_keys_stay_in_range() {
        let mut source = StdRng::seed_from_u64(11);
        // Exponent wider than the key type; every index must still fit.
        let hash: MulShiftHash<u8> = MulShiftHash::draw(10, &mut source);
        for key in 0..=u8::MAX {
            assert!(hash.index(&key) < 1 << 10);
        }
    }

    #[test]
    fn signed_keys_hash() {
        let mut source = StdRng::seed_from_u64(13);
        let hash: MulShiftHash<i32> = MulShiftHash::draw(6, &mut source);
        for key in [-1000i32, -1, 0, 1, i32::MIN, i32::MAX] {
            assert!(hash.index(&key) < 64);
        }
    }

    #[test]
    fn rehash_changes_parameters() {
        let mut source = StdRng::seed_from_u64(17);
        let mut hash: MulShiftHash<u64> = MulShiftHash::draw(8, &mut source);
        let before: Vec<usize> = (0..64u64).map(|k| hash.index(&k)).collect();
        hash.rehash();
        let after: Vec<usize> = (0..64u64).map(|k| hash.index(&k)).collect();
        // A redraw that maps 64 keys identically is (2^-384)-unlikely.
        assert_ne!(before, after);
    }

    #[test]
    fn draw_is_deterministic_under_a_seed() {
        let mut a = StdRng::seed_from_u64(23);
        let mut b = StdRng::seed_from_u64(23);
        let ha: MulShiftHash<u64> = MulShiftHash::draw(10, &mut a);
        let hb: MulShiftHash<u64> = MulShiftHash::draw(10, &mut b);
        for key in 0..4096u64 {
            assert_eq!(ha.index(&key), hb.index(&key));
        }
    }

    #[test]
    fn exponent_zero_maps_everything_to_zero() {
        let mut source = StdRng::seed_from_u64(29);
        let hash: MulShiftHash<u64> = MulShiftHash::draw(0, &mut source);
        for key in [0u64, 1, u64::MAX] {
            assert_eq!(hash.index(&key), 0);
        }
    }
}
