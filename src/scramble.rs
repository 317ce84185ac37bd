//! Deterministic 64-bit hash scrambling.
//!
//! `scramble(x) = x·6364136223846793005 + 9223372036854775783 (mod 2^64)`.
//! The multiplier is the MT19937-64 initialization constant (odd, hence a
//! bijection mod 2^64) and the increment is the largest prime below 2^63.
//!
//! Applying it `t` times to one rolling hash gives tab `t - 1` a different
//! ordering of the same hash stream, without rehashing the text per tab.

/// Multiplier of [`scramble`].
pub const SCRAMBLE_MUL: u64 = 6_364_136_223_846_793_005;
/// Increment of [`scramble`].
pub const SCRAMBLE_ADD: u64 = 9_223_372_036_854_775_783;

/// Permute the bits of a 64-bit hash.
#[inline]
pub fn scramble(x: u64) -> u64 {
    x.wrapping_mul(SCRAMBLE_MUL).wrapping_add(SCRAMBLE_ADD)
}

/// Apply [`scramble`] `n` times, in O(log n).
pub fn scramble_n(x: u64, n: u64) -> u64 {
    Affine::SCRAMBLE.pow(n).apply(x)
}

/// An affine map `x -> mul·x + add` over `u64` with wrapping arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affine {
    /// Multiplier.
    pub mul: u64,
    /// Increment.
    pub add: u64,
}

impl Affine {
    /// `x -> x`.
    pub const IDENTITY: Affine = Affine { mul: 1, add: 0 };
    /// The map computed by [`scramble`].
    pub const SCRAMBLE: Affine = Affine {
        mul: SCRAMBLE_MUL,
        add: SCRAMBLE_ADD,
    };

    /// Evaluate the map at `x`.
    #[inline]
    pub fn apply(self, x: u64) -> u64 {
        x.wrapping_mul(self.mul).wrapping_add(self.add)
    }

    /// The map applying `self` first, then `next`.
    pub fn then(self, next: Affine) -> Affine {
        Affine {
            mul: next.mul.wrapping_mul(self.mul),
            add: next.mul.wrapping_mul(self.add).wrapping_add(next.add),
        }
    }

    /// `self` composed with itself `n` times (square-and-multiply).
    pub fn pow(self, mut n: u64) -> Affine {
        let mut result = Affine::IDENTITY;
        let mut base = self;
        while n > 0 {
            if n & 1 == 1 {
                result = result.then(base);
            }
            base = base.then(base);
            n >>= 1;
        }
        result
    }
}
