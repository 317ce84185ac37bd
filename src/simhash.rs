//! SimHash: binary fingerprints for fast near-duplicate detection.
//!
//! SimHash (Charikar, 2002) reduces a set of 64-bit hashes to one 64-bit value
//! by bitwise majority vote: output bit `i` is set iff more than half of the
//! inputs have bit `i` set. Documents sharing most of their shingles end up
//! with fingerprints at small Hamming distance.

use crate::distance::sim_hashes_dist;
use crate::error::{Error, Result};
use crate::popcount::hamming;
use crate::shingle::{shingles_calc, ShingleMatrix};

/// Fingerprint `text`: one SimHash per tab of its shingle matrix.
///
/// `courses` must be odd; an even value is rejected before any hashing.
///
/// ```rust
/// use shinglesketch::sim_hash_text;
///
/// let a = sim_hash_text(b"The quick brown fox jumps over the lazy dog.", 8, 29, 10).unwrap();
/// let b = sim_hash_text(b"The quick brown fox jumps over the lazy dog!", 8, 29, 10).unwrap();
/// assert_eq!(a.len(), 10);
/// assert!(a.distance(&b).unwrap() < 32);
/// assert!(sim_hash_text(b"text", 8, 28, 10).is_err());
/// ```
pub fn sim_hash_text(
    text: &[u8],
    window: usize,
    courses: usize,
    tabs: usize,
) -> Result<SimHashVector> {
    if courses % 2 == 0 {
        return Err(Error::EvenCourses { courses });
    }
    Ok(shingles_calc(text, window, courses, tabs)?.sim_hashes())
}

/// Reduce one tab of shingles to a SimHash by bitwise majority vote.
///
/// A bit is set when strictly more than `len / 2` inputs have it set, so with an
/// even number of inputs a tie counts as 0. Use an odd number of courses to
/// avoid that bias. An empty slice yields 0.
pub fn sim_hash(tab: &[u64]) -> u64 {
    let half = tab.len() / 2;
    let mut counts = [0usize; 64];
    for &h in tab {
        let mut bits = h;
        while bits != 0 {
            counts[bits.trailing_zeros() as usize] += 1;
            bits &= bits - 1;
        }
    }
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c > half)
        .fold(0u64, |acc, (i, _)| acc | (1u64 << i))
}

/// A SimHash fingerprint (64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SimHashFingerprint(pub u64);

impl SimHashFingerprint {
    /// Hamming distance between two fingerprints (XOR + popcount).
    pub fn hamming_distance(&self, other: &Self) -> u32 {
        hamming(self.0, other.0)
    }
}

impl From<u64> for SimHashFingerprint {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// One SimHash per tab of a document's shingle matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SimHashVector(Vec<u64>);

impl SimHashVector {
    /// Fingerprint every tab of `matrix`.
    pub fn from_matrix(matrix: &ShingleMatrix) -> Self {
        Self(matrix.rows().iter().map(|row| sim_hash(row)).collect())
    }

    /// Minimum per-tab Hamming distance to `other`; see [`sim_hashes_dist`].
    pub fn distance(&self, other: &Self) -> Result<u32> {
        sim_hashes_dist(&self.0, &other.0)
    }

    /// Fingerprint of tab `t`.
    pub fn get(&self, t: usize) -> Option<SimHashFingerprint> {
        self.0.get(t).copied().map(SimHashFingerprint)
    }

    /// Iterate fingerprints in tab order.
    pub fn iter(&self) -> impl Iterator<Item = SimHashFingerprint> + '_ {
        self.0.iter().copied().map(SimHashFingerprint)
    }

    /// Raw fingerprints.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Take the raw fingerprints.
    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }

    /// Number of tabs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no tabs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u64>> for SimHashVector {
    fn from(v: Vec<u64>) -> Self {
        Self(v)
    }
}
