//! Rabin–Karp rolling hash over a fixed-width byte window.
//!
//! The hash of a window `b[0..w]` is
//!
//! ```text
//! H = T[b0]·B^(w-1) + T[b1]·B^(w-2) + ... + T[b(w-1)]   (mod 2^64)
//! ```
//!
//! where `T` is a fixed byte substitution table and `B` an odd base. Sliding
//! by one byte is `H' = H·B + T[in] − T[out]·B^w`, so each update is O(1)
//! regardless of the window width.

use crate::error::{Error, Result};

/// Polynomial base (the 64-bit FNV prime; odd, so multiplication is a bijection mod 2^64).
const BASE: u64 = 0x0000_0100_0000_01B3;

/// Byte substitution table, so that small byte values still spread over all 64 bits.
static BYTE_TABLE: [u64; 256] = byte_table();

/// SplitMix64 sequence, evaluated at compile time.
const fn byte_table() -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut state = 0u64;
    let mut i = 0;
    while i < 256 {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        table[i] = z ^ (z >> 31);
        i += 1;
    }
    table
}

/// Hash a complete window from scratch.
///
/// This is the value [`RollingWindow::push`] reports once its window holds exactly `bytes`.
pub fn window_hash(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |h, &b| {
        h.wrapping_mul(BASE).wrapping_add(BYTE_TABLE[b as usize])
    })
}

/// A sliding window of the last `width` bytes with an O(1) rolling hash.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    buf: Vec<u8>,
    /// Next slot to overwrite; once full, also the oldest byte.
    pos: usize,
    filled: usize,
    hash: u64,
    /// `BASE^width`, the weight of the byte leaving the window.
    out_factor: u64,
}

impl RollingWindow {
    /// Create an empty window of `width` bytes.
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::InvalidParam("window must be >= 1"));
        }
        let mut out_factor = 1u64;
        for _ in 0..width {
            out_factor = out_factor.wrapping_mul(BASE);
        }
        Ok(Self {
            buf: vec![0; width],
            pos: 0,
            filled: 0,
            hash: 0,
            out_factor,
        })
    }

    /// Push one byte, dropping the oldest once the window is full.
    ///
    /// Returns the hash of the current window, or `None` while fewer than
    /// `width` bytes have been pushed.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Option<u64> {
        self.hash = self
            .hash
            .wrapping_mul(BASE)
            .wrapping_add(BYTE_TABLE[byte as usize]);
        if self.filled == self.buf.len() {
            let outgoing = BYTE_TABLE[self.buf[self.pos] as usize];
            self.hash = self.hash.wrapping_sub(outgoing.wrapping_mul(self.out_factor));
        } else {
            self.filled += 1;
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        if self.pos == self.buf.len() {
            self.pos = 0;
        }
        self.hash()
    }

    /// Hash of the current window, if it is full.
    #[inline]
    pub fn hash(&self) -> Option<u64> {
        self.is_full().then_some(self.hash)
    }

    /// True once `width` bytes have been pushed.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled == self.buf.len()
    }

    /// Window width in bytes.
    pub fn width(&self) -> usize {
        self.buf.len()
    }

    /// Forget all pushed bytes.
    pub fn reset(&mut self) {
        self.buf.fill(0);
        self.pos = 0;
        self.filled = 0;
        self.hash = 0;
    }
}
