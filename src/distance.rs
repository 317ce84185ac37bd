//! Dissimilarity between two documents' shingles or SimHashes.

use crate::error::{Error, Result};
use crate::popcount::hamming;
use crate::shingle::ShingleMatrix;

/// Count common values of two ascending slices with a linear merge.
///
/// Returns `(matches, max(a.len(), b.len()))`. Equal values pair up one to one,
/// so repeated values count as many times as they appear in both.
pub fn sorted_vector_cmp(a: &[u64], b: &[u64]) -> (usize, usize) {
    let (mut i, mut j) = (0, 0);
    let mut matches = 0;
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if b[j] < a[i] {
            j += 1;
        } else {
            matches += 1;
            i += 1;
            j += 1;
        }
    }
    (matches, a.len().max(b.len()))
}

/// Dissimilarity in `[0, 1]` between two shingle matrices.
///
/// Sums matches and row lengths over all tabs:
/// `(Σ max_len − Σ matches) / Σ max_len`. Returns `1.0` when every row is empty.
pub fn shingles_dist(a: &ShingleMatrix, b: &ShingleMatrix) -> Result<f64> {
    if a.tabs() != b.tabs() {
        return Err(Error::TabCountMismatch {
            expected: a.tabs(),
            got: b.tabs(),
        });
    }
    let (numer, denom) = a
        .rows()
        .iter()
        .zip(b.rows())
        .map(|(ra, rb)| sorted_vector_cmp(ra, rb))
        .fold((0usize, 0usize), |(n, d), (m, l)| (n + m, d + l));
    if denom == 0 {
        return Ok(1.0);
    }
    Ok((denom - numer) as f64 / denom as f64)
}

/// Smallest Hamming distance between corresponding SimHashes.
///
/// Each tab is an independent estimate; two documents are as close as their
/// closest tab. Two empty vectors have distance 64.
pub fn sim_hashes_dist(a: &[u64], b: &[u64]) -> Result<u32> {
    if a.len() != b.len() {
        return Err(Error::TabCountMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b)
        .map(|(&x, &y)| hamming(x, y))
        .fold(64, u32::min))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_counts_common_values() {
        assert_eq!(sorted_vector_cmp(&[1, 3, 5, 7], &[3, 4, 5, 8, 9]), (2, 5));
        assert_eq!(sorted_vector_cmp(&[], &[1, 2]), (0, 2));
        assert_eq!(sorted_vector_cmp(&[2, 2, 2], &[2, 2]), (2, 3));
    }

    #[test]
    fn identical_matrices_have_zero_distance() {
        let m = ShingleMatrix::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(shingles_dist(&m, &m), Ok(0.0));
    }

    #[test]
    fn disjoint_matrices_have_unit_distance() {
        let a = ShingleMatrix::from(vec![vec![1, 2, 3]]);
        let b = ShingleMatrix::from(vec![vec![4, 5, 6]]);
        assert_eq!(shingles_dist(&a, &b), Ok(1.0));
    }

    #[test]
    fn partial_overlap() {
        let a = ShingleMatrix::from(vec![vec![1, 2, 3, 4], vec![10, 20, 30, 40]]);
        let b = ShingleMatrix::from(vec![vec![1, 2, 5, 6], vec![10, 20, 30, 50]]);
        // matches 2 + 3 of 8
        assert!((shingles_dist(&a, &b).unwrap() - 3.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn empty_rows_are_maximally_distant() {
        let a = ShingleMatrix::from(vec![vec![], vec![]]);
        assert_eq!(shingles_dist(&a, &a), Ok(1.0));
        assert_eq!(shingles_dist(&ShingleMatrix::default(), &ShingleMatrix::default()), Ok(1.0));
    }

    #[test]
    fn tab_mismatch_is_an_error() {
        let a = ShingleMatrix::from(vec![vec![1]]);
        let b = ShingleMatrix::from(vec![vec![1], vec![2]]);
        assert_eq!(
            shingles_dist(&a, &b),
            Err(Error::TabCountMismatch { expected: 1, got: 2 })
        );
        assert!(sim_hashes_dist(&[1, 2], &[1]).is_err());
    }

    #[test]
    fn simhash_distance_is_minimum_over_tabs() {
        let a = [0u64, 0, 0];
        let b = [u64::MAX, 0b111, 0b1];
        assert_eq!(sim_hashes_dist(&a, &b), Ok(1));
        assert_eq!(sim_hashes_dist(&b, &b), Ok(0));
        assert_eq!(sim_hashes_dist(&[], &[]), Ok(64));
    }
}
