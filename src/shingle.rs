//! Rolling-hash shingles, scrambled into several tabs.
//!
//! Terminology follows roofing shingles: a shingle has several *tabs* side by
//! side, and each horizontal row of shingles on a roof is a *course*. Here:
//!
//! - every byte window of the text is hashed with a rolling hash;
//! - tab `t` sees each hash scrambled `t + 1` times, a different ordering of
//!   the same stream;
//! - each tab keeps its `courses` smallest scrambled hashes.
//!
//! The result is a `tabs × courses` matrix: `courses` high, `tabs` wide.
//!
//! ```rust
//! use shinglesketch::shingle::shingles_calc;
//!
//! let m = shingles_calc(b"the quick brown fox jumps over the lazy dog", 8, 5, 3).unwrap();
//! assert_eq!(m.tabs(), 3);
//! assert!(m.rows().iter().all(|row| row.len() == 5));
//! ```

use crate::distance::shingles_dist;
use crate::error::{Error, Result};
use crate::heap::MinSelector;
use crate::rolling::RollingWindow;
use crate::scramble::scramble;
use crate::simhash::SimHashVector;

/// Window, course and tab counts for shingle extraction and fingerprinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShingleParams {
    /// Width in bytes of the sliding window that is hashed.
    pub window: usize,
    /// Number of smallest hashes kept per tab. Must be odd for fingerprinting.
    pub courses: usize,
    /// Number of scrambled variants of the hash stream.
    pub tabs: usize,
}

impl Default for ShingleParams {
    fn default() -> Self {
        Self {
            window: 32,
            courses: 29,
            tabs: 10,
        }
    }
}

impl ShingleParams {
    /// Create parameters valid for fingerprinting (non-zero counts, odd `courses`).
    pub fn new(window: usize, courses: usize, tabs: usize) -> Result<Self> {
        let params = Self {
            window,
            courses,
            tabs,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the rules for raw extraction: every count must be non-zero.
    pub fn validate_extraction(&self) -> Result<()> {
        if self.window == 0 {
            return Err(Error::InvalidParam("window must be >= 1"));
        }
        if self.courses == 0 {
            return Err(Error::InvalidParam("courses must be >= 1"));
        }
        if self.tabs == 0 {
            return Err(Error::InvalidParam("tabs must be >= 1"));
        }
        Ok(())
    }

    /// Check the rules for fingerprinting: extraction rules plus odd `courses`.
    pub fn validate(&self) -> Result<()> {
        if self.courses % 2 == 0 {
            return Err(Error::EvenCourses {
                courses: self.courses,
            });
        }
        self.validate_extraction()
    }

    /// Start a streaming extractor with these parameters.
    pub fn extractor(&self) -> Result<ShingleExtractor> {
        ShingleExtractor::new(self.window, self.courses, self.tabs)
    }

    /// Shingle matrix of `text`.
    pub fn shingles(&self, text: &[u8]) -> Result<ShingleMatrix> {
        shingles_calc(text, self.window, self.courses, self.tabs)
    }

    /// SimHash vector of `text`.
    pub fn fingerprint(&self, text: &[u8]) -> Result<SimHashVector> {
        crate::simhash::sim_hash_text(text, self.window, self.courses, self.tabs)
    }
}

/// `tabs` rows of shingle hashes, each sorted ascending.
///
/// Rows produced by extraction hold `courses` values, except for the
/// short-input fallback described on [`ShingleExtractor::finish`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ShingleMatrix(Vec<Vec<u64>>);

impl ShingleMatrix {
    /// All rows, one per tab.
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.0
    }

    /// Row of tab `t`.
    pub fn row(&self, t: usize) -> Option<&[u64]> {
        self.0.get(t).map(Vec::as_slice)
    }

    /// Number of tabs.
    pub fn tabs(&self) -> usize {
        self.0.len()
    }

    /// Dissimilarity in `[0, 1]`; see [`shingles_dist`].
    pub fn distance(&self, other: &Self) -> Result<f64> {
        shingles_dist(self, other)
    }

    /// Reduce each tab to a SimHash.
    pub fn sim_hashes(&self) -> SimHashVector {
        SimHashVector::from_matrix(self)
    }

    /// Take the raw rows.
    pub fn into_inner(self) -> Vec<Vec<u64>> {
        self.0
    }
}

/// Wrap stored rows. Rows must already be sorted ascending for [`shingles_dist`].
impl From<Vec<Vec<u64>>> for ShingleMatrix {
    fn from(rows: Vec<Vec<u64>>) -> Self {
        Self(rows)
    }
}

/// Streaming shingle extraction; bytes may arrive in any number of chunks.
#[derive(Debug, Clone)]
pub struct ShingleExtractor {
    window: RollingWindow,
    selectors: Vec<MinSelector>,
    courses: usize,
}

impl ShingleExtractor {
    /// Create an extractor. `courses` is not required to be odd here.
    pub fn new(window: usize, courses: usize, tabs: usize) -> Result<Self> {
        ShingleParams {
            window,
            courses,
            tabs,
        }
        .validate_extraction()?;
        Ok(Self {
            window: RollingWindow::new(window)?,
            selectors: (0..tabs).map(|_| MinSelector::new(courses)).collect(),
            courses,
        })
    }

    /// Hash `bytes` into every tab.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if let Some(raw) = self.window.push(b) {
                let mut h = raw;
                for selector in &mut self.selectors {
                    h = scramble(h);
                    selector.update(h);
                }
            }
        }
    }

    /// Finish the stream and normalize each tab.
    ///
    /// With `n` hashes retained in a tab:
    /// - `n == courses`: the values, sorted;
    /// - `n == 0`: `courses` zeros;
    /// - otherwise the values are repeated `ceil(courses / n)` times, sorted,
    ///   and cut to `courses + 1` entries. That cut keeps one more value than
    ///   `courses` whenever the repetition overshoots, so such a row can be
    ///   `courses + 1` long. Stored sketches depend on this exact layout.
    pub fn finish(self) -> ShingleMatrix {
        let courses = self.courses;
        let rows = self
            .selectors
            .into_iter()
            .enumerate()
            .map(|(tab, selector)| {
                let values = selector.into_sorted_vec();
                if values.len() != courses {
                    tracing::trace!(tab, retained = values.len(), courses, "padding short tab");
                }
                normalize_course(values, courses)
            })
            .collect();
        ShingleMatrix(rows)
    }
}

fn normalize_course(values: Vec<u64>, courses: usize) -> Vec<u64> {
    let n = values.len();
    if n == courses {
        return values;
    }
    if n == 0 {
        return vec![0; courses];
    }
    let copies = (courses + n - 1) / n;
    let mut out = values.repeat(copies);
    out.sort_unstable();
    out.truncate(courses + 1);
    out
}

/// Compute the `tabs × courses` shingle matrix of `text`.
///
/// `window` is the number of bytes hashed at a time. Inputs shorter than
/// `window` produce all-zero rows.
#[tracing::instrument(level = "trace", skip(text), fields(len = text.len()))]
pub fn shingles_calc(
    text: &[u8],
    window: usize,
    courses: usize,
    tabs: usize,
) -> Result<ShingleMatrix> {
    let mut extractor = ShingleExtractor::new(window, courses, tabs)?;
    extractor.feed(text);
    Ok(extractor.finish())
}
