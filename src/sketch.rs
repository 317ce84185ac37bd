//! Per-document sketches and near-duplicate detection on top of them.
//!
//! A [`Sketch`] is what a document pipeline attaches to each document: the
//! shingle matrix (exact comparisons) and its SimHash vector (cheap
//! comparisons). [`SketchIndex`] finds near-duplicate pairs among stored
//! texts, and [`uniquify`] drops near-duplicates from a stream.
//!
//! # Example
//!
//! ```rust
//! use shinglesketch::sketch::{SketchConfig, SketchIndex};
//!
//! let mut index = SketchIndex::new(SketchConfig::default()).unwrap();
//! index.insert_text("a", "Sketches are attached to every document before indexing.").unwrap();
//! index.insert_text("b", "Sketches are attached to every document before indexing.").unwrap();
//! index.insert_text("c", "An entirely different sentence about roofing and weather.").unwrap();
//!
//! let pairs = index.near_duplicate_pairs().unwrap();
//! assert_eq!(pairs.len(), 1);
//! assert_eq!((pairs[0].0, pairs[0].1), (0, 1));
//! ```
//!
//! # Notes
//!
//! - Text is hashed as UTF-8 **bytes**, not characters.
//! - Comparing every pair is quadratic; this is meant for batches, not corpora.

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::shingle::{ShingleMatrix, ShingleParams};
use crate::simhash::SimHashVector;

/// Configuration for sketching and near-duplicate decisions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SketchConfig {
    /// Bytes per hashed window.
    pub window: usize,
    /// Smallest hashes kept per tab (odd).
    pub courses: usize,
    /// Scrambled variants per document.
    pub tabs: usize,
    /// Largest shingle distance at which two documents count as near-duplicates.
    pub threshold: f64,
    /// Skip the exact comparison when the SimHash distance exceeds this many
    /// bits. 64 disables the prefilter.
    pub max_simhash_bits: u32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            window: 17,
            courses: 29,
            tabs: 10,
            threshold: 0.4,
            max_simhash_bits: 64,
        }
    }
}

impl SketchConfig {
    /// Looser threshold: more documents are treated as duplicates.
    pub fn high_recall() -> Self {
        Self {
            threshold: 0.6,
            ..Default::default()
        }
    }

    /// Tighter threshold and a SimHash prefilter: only very close documents match.
    pub fn high_precision() -> Self {
        Self {
            threshold: 0.2,
            max_simhash_bits: 16,
            ..Default::default()
        }
    }

    /// Shingle parameters for this config.
    pub fn params(&self) -> ShingleParams {
        ShingleParams {
            window: self.window,
            courses: self.courses,
            tabs: self.tabs,
        }
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        self.params().validate()?;
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidParam("threshold must be in [0, 1]"));
        }
        if self.max_simhash_bits > 64 {
            return Err(Error::InvalidParam("max_simhash_bits must be <= 64"));
        }
        Ok(())
    }
}

/// Fingerprints of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sketch {
    shingles: ShingleMatrix,
    simhashes: SimHashVector,
}

impl Sketch {
    /// Build a sketch from a shingle matrix, deriving its SimHashes.
    pub fn from_shingles(shingles: ShingleMatrix) -> Self {
        let simhashes = shingles.sim_hashes();
        Self {
            shingles,
            simhashes,
        }
    }

    /// Shingle matrix.
    pub fn shingles(&self) -> &ShingleMatrix {
        &self.shingles
    }

    /// SimHash vector.
    pub fn simhashes(&self) -> &SimHashVector {
        &self.simhashes
    }

    /// Exact shingle dissimilarity in `[0, 1]`.
    pub fn distance(&self, other: &Self) -> Result<f64> {
        self.shingles.distance(&other.shingles)
    }

    /// Minimum per-tab SimHash Hamming distance.
    pub fn simhash_distance(&self, other: &Self) -> Result<u32> {
        self.simhashes.distance(&other.simhashes)
    }
}

/// Computes sketches and near-duplicate decisions for one configuration.
#[derive(Debug, Clone)]
pub struct Sketcher {
    config: SketchConfig,
}

impl Sketcher {
    /// Create a sketcher, rejecting invalid configurations.
    pub fn new(config: SketchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Sketch UTF-8 text.
    pub fn sketch(&self, text: &str) -> Result<Sketch> {
        self.sketch_bytes(text.as_bytes())
    }

    /// Sketch raw bytes.
    pub fn sketch_bytes(&self, bytes: &[u8]) -> Result<Sketch> {
        Ok(Sketch::from_shingles(self.config.params().shingles(bytes)?))
    }

    /// True if `a` and `b` are within the configured threshold.
    pub fn is_near_duplicate(&self, a: &Sketch, b: &Sketch) -> Result<bool> {
        let bits = self.config.max_simhash_bits;
        if bits < 64 && a.simhash_distance(b)? > bits {
            return Ok(false);
        }
        Ok(a.distance(b)? <= self.config.threshold)
    }
}

/// A text stored in a [`SketchIndex`].
#[derive(Debug, Clone)]
pub struct SketchedText {
    /// External identifier.
    pub id: String,
    /// The raw text content.
    pub text: String,
    sketch: Sketch,
}

impl SketchedText {
    /// Sketch of the text.
    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }
}

/// In-memory collection of sketched texts.
#[derive(Debug)]
pub struct SketchIndex {
    sketcher: Sketcher,
    items: Vec<SketchedText>,
}

impl SketchIndex {
    /// Create an empty index.
    pub fn new(config: SketchConfig) -> Result<Self> {
        Ok(Self {
            sketcher: Sketcher::new(config)?,
            items: Vec::new(),
        })
    }

    /// Sketch and store a text; returns its index.
    pub fn insert_text(&mut self, id: impl Into<String>, text: impl Into<String>) -> Result<usize> {
        let text = text.into();
        let sketch = self.sketcher.sketch(&text)?;
        self.items.push(SketchedText {
            id: id.into(),
            text,
            sketch,
        });
        Ok(self.items.len() - 1)
    }

    /// Stored texts that are near-duplicates of `text`, closest first.
    pub fn query(&self, text: &str) -> Result<Vec<(usize, f64)>> {
        let sketch = self.sketcher.sketch(text)?;
        let mut hits = Vec::new();
        for (idx, item) in self.items.iter().enumerate() {
            if self.sketcher.is_near_duplicate(&sketch, &item.sketch)? {
                hits.push((idx, sketch.distance(&item.sketch)?));
            }
        }
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(hits)
    }

    /// All `(i, j, distance)` with `i < j` that are near-duplicates.
    #[instrument(level = "debug", skip(self), fields(items = self.items.len()))]
    pub fn near_duplicate_pairs(&self) -> Result<Vec<(usize, usize, f64)>> {
        let mut pairs = Vec::new();
        for (i, a) in self.items.iter().enumerate() {
            for (j, b) in self.items.iter().enumerate().skip(i + 1) {
                if self.sketcher.is_near_duplicate(&a.sketch, &b.sketch)? {
                    pairs.push((i, j, a.sketch.distance(&b.sketch)?));
                }
            }
        }
        debug!(pairs = pairs.len(), "near-duplicate scan finished");
        Ok(pairs)
    }

    /// Get the item at a given index.
    pub fn get(&self, idx: usize) -> Option<&SketchedText> {
        self.items.get(idx)
    }

    /// Number of items indexed.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Keep the first document of every near-duplicate group, in input order.
///
/// A document is dropped when it is within the threshold of any document
/// already kept.
pub fn uniquify<I, K, T>(config: &SketchConfig, docs: I) -> Result<Vec<(K, T)>>
where
    I: IntoIterator<Item = (K, T)>,
    T: AsRef<[u8]>,
{
    let sketcher = Sketcher::new(config.clone())?;
    let mut kept = Vec::new();
    let mut sketches: Vec<Sketch> = Vec::new();
    let mut dropped = 0usize;

    for (id, text) in docs {
        let sketch = sketcher.sketch_bytes(text.as_ref())?;
        let mut duplicate = false;
        for seen in &sketches {
            if sketcher.is_near_duplicate(&sketch, seen)? {
                duplicate = true;
                break;
            }
        }
        if duplicate {
            dropped += 1;
        } else {
            sketches.push(sketch);
            kept.push((id, text));
        }
    }

    debug!(kept = kept.len(), dropped, "uniquify finished");
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: &str = "Rolling hashes slide a fixed window over the document one byte at a time. \
        Each position yields a hash, and only the smallest few hundred are kept per variant, \
        which makes the fingerprint independent of document length.";
    const EDITED: &str = "Rolling hashes slide a fixed window over the document one byte at a time. \
        Each position yields a hash, and only the smallest few dozen are kept per variant, \
        which makes the fingerprint independent of document length.";
    const OTHER: &str = "Quarterly revenue grew in every region except the northeast, where \
        a late shipment of parts delayed two product launches into the following year.";

    #[test]
    fn identical_texts_are_near_duplicates() {
        let sk = Sketcher::new(SketchConfig::default()).unwrap();
        let a = sk.sketch(ORIGINAL).unwrap();
        let b = sk.sketch(ORIGINAL).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.distance(&b), Ok(0.0));
        assert_eq!(a.simhash_distance(&b), Ok(0));
        assert!(sk.is_near_duplicate(&a, &b).unwrap());
    }

    #[test]
    fn small_edit_stays_close() {
        let sk = Sketcher::new(SketchConfig::default()).unwrap();
        let a = sk.sketch(ORIGINAL).unwrap();
        let b = sk.sketch(EDITED).unwrap();
        let c = sk.sketch(OTHER).unwrap();
        let near = a.distance(&b).unwrap();
        let far = a.distance(&c).unwrap();
        assert!(near < far, "edited {near} vs unrelated {far}");
        assert!(!sk.is_near_duplicate(&a, &c).unwrap());
    }

    #[test]
    fn index_query_orders_by_distance() {
        let mut ix = SketchIndex::new(SketchConfig::default()).unwrap();
        ix.insert_text("other", OTHER).unwrap();
        ix.insert_text("orig", ORIGINAL).unwrap();
        let hits = ix.query(ORIGINAL).unwrap();
        assert_eq!(hits.first().map(|h| h.0), Some(1));
        assert_eq!(hits[0].1, 0.0);
        assert!(hits.iter().all(|h| h.0 != 0));
        assert_eq!(ix.get(1).map(|t| t.id.as_str()), Some("orig"));
    }

    #[test]
    fn uniquify_keeps_first_occurrence() {
        let docs = vec![("1", ORIGINAL), ("2", OTHER), ("3", ORIGINAL)];
        let kept = uniquify(&SketchConfig::default(), docs).unwrap();
        let ids: Vec<&str> = kept.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn presets_are_valid() {
        assert!(SketchConfig::default().validate().is_ok());
        assert!(SketchConfig::high_recall().validate().is_ok());
        assert!(SketchConfig::high_precision().validate().is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let even = SketchConfig {
            courses: 28,
            ..Default::default()
        };
        assert_eq!(Sketcher::new(even).err(), Some(Error::EvenCourses { courses: 28 }));

        let bad_threshold = SketchConfig {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(Sketcher::new(bad_threshold), Err(Error::InvalidParam(_))));

        let nan_threshold = SketchConfig {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(nan_threshold.validate().is_err());
    }

    #[test]
    fn simhash_prefilter_rejects_distant_pairs() {
        let config = SketchConfig {
            threshold: 1.0,
            max_simhash_bits: 0,
            ..Default::default()
        };
        let sk = Sketcher::new(config).unwrap();
        let a = sk.sketch(ORIGINAL).unwrap();
        let c = sk.sketch(OTHER).unwrap();
        assert!(sk.is_near_duplicate(&a, &a).unwrap());
        if a.simhash_distance(&c).unwrap() > 0 {
            assert!(!sk.is_near_duplicate(&a, &c).unwrap());
        }
    }
}
