//! `shinglesketch`: rolling-hash shingles and SimHash fingerprints.
//!
//! This crate computes **near-duplicate fingerprints** for documents:
//! - shingles: the smallest rolling-hash values of a byte stream, in several
//!   independently scrambled "tabs"
//! - SimHash: one 64-bit majority-vote fingerprint per tab
//! - distances: exact shingle overlap, or the minimum per-tab Hamming distance
//!
//! Scope here is *primitives*: extraction, fingerprints, comparisons, plus a small
//! sketch/dedup layer. Reading documents, storing sketches and clustering belong elsewhere.
//!
//! ```rust
//! use shinglesketch::{shingles_calc, shingles_dist, sim_hash_text};
//!
//! let a = b"Near-duplicate documents share most of their byte windows.";
//! let b = b"Near-duplicate documents share most of their byte windows!";
//!
//! let ma = shingles_calc(a, 16, 29, 10).unwrap();
//! let mb = shingles_calc(b, 16, 29, 10).unwrap();
//! assert!(shingles_dist(&ma, &mb).unwrap() < 0.5);
//!
//! let fa = sim_hash_text(a, 16, 29, 10).unwrap();
//! assert_eq!(fa.distance(&fa).unwrap(), 0);
//! ```
//!
//! All computation is synchronous and per-document; sketch many documents in
//! parallel by giving each task its own document.

#![warn(missing_docs)]

pub mod distance;
pub mod error;
pub mod heap;
pub mod popcount;
pub mod rolling;
pub mod scramble;
pub mod shingle;
pub mod simhash;
pub mod sketch;

pub use distance::{shingles_dist, sim_hashes_dist, sorted_vector_cmp};
pub use error::{Error, Result};
pub use heap::MinSelector;
pub use rolling::RollingWindow;
pub use scramble::{scramble, scramble_n};
pub use shingle::{shingles_calc, ShingleExtractor, ShingleMatrix, ShingleParams};
pub use simhash::{sim_hash, sim_hash_text, SimHashFingerprint, SimHashVector};
pub use sketch::{uniquify, Sketch, SketchConfig, SketchIndex, Sketcher};
