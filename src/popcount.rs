//! Hamming distance with a once-selected population-count routine.
//!
//! On first use the CPU is probed for a native population-count instruction
//! (`popcnt` on x86_64; always present on aarch64). The chosen routine is stored
//! behind a function pointer, so later calls skip feature detection entirely.

use std::sync::OnceLock;

/// Signature shared by all Hamming routines.
pub type HammingFn = fn(u64, u64) -> u32;

/// Which population-count routine is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Hardware population count.
    Native,
    /// Portable bit-clearing loop.
    Portable,
}

static SELECTED: OnceLock<(Strategy, HammingFn)> = OnceLock::new();

/// Number of differing bits between `a` and `b`.
#[inline]
pub fn hamming(a: u64, b: u64) -> u32 {
    (selected().1)(a, b)
}

/// The strategy picked for this process.
pub fn strategy() -> Strategy {
    selected().0
}

fn selected() -> &'static (Strategy, HammingFn) {
    SELECTED.get_or_init(|| {
        let picked = detect();
        tracing::debug!(strategy = ?picked.0, "selected hamming routine");
        picked
    })
}

fn detect() -> (Strategy, HammingFn) {
    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("popcnt") {
        return (Strategy::Native, x86_64::hamming_native);
    }

    if cfg!(target_arch = "aarch64") {
        return (Strategy::Native, hamming_count_ones);
    }

    (Strategy::Portable, hamming_portable)
}

/// Portable Hamming distance: clears the lowest set bit until none remain.
pub fn hamming_portable(a: u64, b: u64) -> u32 {
    let mut x = a ^ b;
    let mut count = 0;
    while x != 0 {
        x &= x - 1;
        count += 1;
    }
    count
}

/// `count_ones`, which lowers to `cnt` on aarch64.
fn hamming_count_ones(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

#[cfg(target_arch = "x86_64")]
mod x86_64 {
    #[target_feature(enable = "popcnt")]
    unsafe fn popcnt(x: u64) -> u32 {
        x.count_ones()
    }

    /// Only bound after `popcnt` support was detected.
    pub(super) fn hamming_native(a: u64, b: u64) -> u32 {
        // SAFETY: selected by `detect` only when the CPU reports `popcnt`.
        unsafe { popcnt(a ^ b) }
    }
}
